use crate::config;
use crate::display;
use crate::formatter;
use crate::ranker;
use crate::result;
use crate::structs;
use crate::tfl;

pub const NO_ARRIVALS_TEXT: &str = "No arrivals";

pub trait ArrivalsSource {
    fn fetch(&mut self, stop_id: &str) -> result::BusDashResult<Vec<structs::ArrivalRecord>>;
}

impl ArrivalsSource for tfl::ArrivalsClient {
    fn fetch(&mut self, stop_id: &str) -> result::BusDashResult<Vec<structs::ArrivalRecord>> {
        return tfl::ArrivalsClient::fetch(self, stop_id);
    }
}

impl<F> ArrivalsSource for F
where F: FnMut(&str) -> result::BusDashResult<Vec<structs::ArrivalRecord>> {
    fn fetch(&mut self, stop_id: &str) -> result::BusDashResult<Vec<structs::ArrivalRecord>> {
        return self(stop_id);
    }
}

/// The lines to show for a batch of arrivals: the soonest `rows` of them,
/// with line names aligned across all of them.
pub fn build_lines(records: &[structs::ArrivalRecord], columns: usize, rows: usize) -> Vec<structs::DisplayLine> {
    let name_width = match ranker::longest_line_name_length(records) {
        Some(width) => width,
        None => return vec![structs::DisplayLine::new(NO_ARRIVALS_TEXT, columns)],
    };

    return ranker::select(records, rows).iter()
        .enumerate()
        .map(|(i, record)| formatter::format_line(record, i + 1, name_width, columns))
        .collect();
}

pub struct BusDash<D: display::CharacterDisplay, S: ArrivalsSource> {
    config: config::Config,
    controller: display::DisplayController<D>,
    source: S,
}

/// Builds the real TfL client. If that fails the error is put on the
/// display before it's returned.
pub fn connect<D: display::CharacterDisplay>(config: config::Config, device: D) -> result::BusDashResult<BusDash<D, tfl::ArrivalsClient>> {
    let mut controller = display::DisplayController::new(device, config.rows);
    let client = display::with_display_error_reporting(&mut controller, || {
        return tfl::ArrivalsClient::new(&config.api_url, config.attempts, config.timeout);
    })?;
    return Ok(BusDash::with_controller(config, controller, client));
}

impl<D: display::CharacterDisplay, S: ArrivalsSource> BusDash<D, S> {
    pub fn new(config: config::Config, device: D, source: S) -> BusDash<D, S> {
        let controller = display::DisplayController::new(device, config.rows);
        return BusDash::with_controller(config, controller, source);
    }

    fn with_controller(config: config::Config, controller: display::DisplayController<D>, source: S) -> BusDash<D, S> {
        return BusDash{
            config: config,
            controller: controller,
            source: source,
        };
    }

    pub fn state(&self) -> &structs::DisplayState {
        return self.controller.state();
    }

    pub fn device(&self) -> &D {
        return self.controller.device();
    }

    /// One poll: show "Updating...", fetch, then either the arrivals or
    /// the error that stopped us.
    pub fn run_once(&mut self) -> result::BusDashResult<()> {
        self.controller.begin()?;

        let source = &mut self.source;
        let config = &self.config;
        let lines = display::with_display_error_reporting(&mut self.controller, || {
            let records = source.fetch(&config.stop_id)?;
            debug!("{} arrivals for stop {}", records.len(), config.stop_id);
            return Ok(build_lines(&records, config.columns, config.rows));
        })?;

        return self.controller.render(lines);
    }
}

#[cfg(test)]
mod tests {
    use crate::config;
    use crate::display::VirtualDisplay;
    use crate::result;
    use crate::structs::{ArrivalRecord, DisplayLine, DisplayState, Rgb};

    fn test_config() -> config::Config {
        return config::Config{
            stop_id: "490008660N".to_string(),
            columns: config::DEFAULT_COLUMNS,
            rows: config::DEFAULT_ROWS,
            attempts: config::DEFAULT_ATTEMPTS,
            timeout: std::time::Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            api_url: "http://test".to_string(),
            skip_display: true,
            interval: None,
            log_dir: None,
        };
    }

    fn sample() -> Vec<ArrivalRecord> {
        return vec![
            ArrivalRecord::new("A", "Highbury", 90),
            ArrivalRecord::new("BB", "Oxford Circus", 30),
            ArrivalRecord::new("C", "Waterloo", 600),
        ];
    }

    #[test]
    fn end_to_end() {
        let config = test_config();
        let mut dash = super::BusDash::new(config, VirtualDisplay::new(16, 3),
            |_stop: &str| -> result::BusDashResult<Vec<ArrivalRecord>> { Ok(sample()) });

        dash.run_once().expect("run_once");

        assert_eq!(vec!["1 BB Oxford  due", "2  A Highbur due", "3  C Water 10min"],
                   dash.device().rows());
        assert_eq!(Some(Rgb::NEUTRAL), dash.device().backlight());
        match dash.state() {
            DisplayState::Normal(lines) => assert_eq!(3, lines.len()),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn asks_for_configured_stop() {
        let mut requested = vec![];
        {
            let mut dash = super::BusDash::new(test_config(), VirtualDisplay::new(16, 3),
                |stop: &str| -> result::BusDashResult<Vec<ArrivalRecord>> {
                    requested.push(stop.to_string());
                    return Ok(sample());
                });
            dash.run_once().expect("run_once");
        }
        assert_eq!(vec!["490008660N".to_string()], requested);
    }

    #[test]
    fn fewer_arrivals_than_rows() {
        let mut dash = super::BusDash::new(test_config(), VirtualDisplay::new(16, 3),
            |_stop: &str| -> result::BusDashResult<Vec<ArrivalRecord>> {
                Ok(vec![ArrivalRecord::new("73", "Oxford Circus", 200)])
            });
        dash.run_once().expect("run_once");
        assert_eq!(vec!["1 73 Oxford 3min", "", ""], dash.device().rows());
    }

    #[test]
    fn no_arrivals_is_not_an_error() {
        let mut dash = super::BusDash::new(test_config(), VirtualDisplay::new(16, 3),
            |_stop: &str| -> result::BusDashResult<Vec<ArrivalRecord>> { Ok(vec![]) });
        dash.run_once().expect("run_once");
        assert_eq!(vec!["No arrivals", "", ""], dash.device().rows());
        assert_eq!(&DisplayState::Normal(vec![DisplayLine::new("No arrivals", 16)]), dash.state());
        assert_eq!(Some(Rgb::NEUTRAL), dash.device().backlight());
    }

    #[test]
    fn fetch_failure_is_shown_then_returned() {
        let mut dash = super::BusDash::new(test_config(), VirtualDisplay::new(16, 3),
            |_stop: &str| -> result::BusDashResult<Vec<ArrivalRecord>> {
                Err(result::make_error("Bad stop"))
            });
        let err = dash.run_once().unwrap_err();
        assert_eq!("Bad stop", err.to_string());
        assert_eq!(vec!["Bad stop", "", ""], dash.device().rows());
        assert_eq!(Some(Rgb::ERROR), dash.device().backlight());
        assert_eq!(&DisplayState::Error("Bad stop".to_string()), dash.state());
    }

    #[test]
    fn next_cycle_recovers() {
        let mut calls = 0;
        let mut dash = super::BusDash::new(test_config(), VirtualDisplay::new(16, 3),
            move |_stop: &str| -> result::BusDashResult<Vec<ArrivalRecord>> {
                calls += 1;
                if calls == 1 {
                    return Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out").into());
                }
                return Ok(sample());
            });

        assert!(dash.run_once().is_err());
        assert_eq!(Some(Rgb::ERROR), dash.device().backlight());

        dash.run_once().expect("second run_once");
        assert_eq!("1 BB Oxford  due", dash.device().rows()[0]);
        assert_eq!(Some(Rgb::NEUTRAL), dash.device().backlight());
    }

    #[test]
    fn bad_api_url_is_shown() {
        let mut config = test_config();
        config.api_url = "not a url".to_string();
        let mut display = VirtualDisplay::new(16, 3);

        match super::connect(config, &mut display) {
            Ok(_) => panic!("expected bad API URL to fail"),
            Err(err) => {
                assert!(!err.is_transport());
                assert!(err.to_string().starts_with("Config Error: bad API URL"));
            },
        }
        assert_eq!("Config Error: ba", display.rows()[0]);
        assert_eq!(Some(Rgb::ERROR), display.backlight());
    }

    #[test]
    fn connect_with_good_url() {
        let dash = super::connect(test_config(), VirtualDisplay::new(16, 3)).expect("connect");
        assert_eq!(&DisplayState::Loading, dash.state());
    }

    #[test]
    fn narrow_display() {
        let lines = super::build_lines(&sample(), 8, 2);
        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        // No room for destinations, and the time label gets cut.
        assert_eq!(vec!["1 BB  du", "2  A  du"], texts);
    }
}
