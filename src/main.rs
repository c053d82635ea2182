// Shows the next few arrivals at one TfL stop on a Display-o-Tron HAT.
// Needs SPI and I2C enabled (sudo raspi-config) unless run with --skip-display.
extern crate anyhow;
extern crate flexi_logger;
extern crate getopts;
#[macro_use]
extern crate log;
extern crate reqwest;
extern crate rppal;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

mod busdash;
mod config;
mod display;
mod dothat;
mod formatter;
mod ranker;
mod result;
mod structs;
mod tfl;

use anyhow::Context;

fn init_logging(config: &config::Config) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let mut logger = flexi_logger::Logger::try_with_env_or_str("info")
        .context("while reading RUST_LOG")?
        .format(flexi_logger::detailed_format);

    if let Some(ref log_dir) = config.log_dir {
        logger = logger
            .log_to_file(flexi_logger::FileSpec::default().directory(log_dir))
            .duplicate_to_stderr(flexi_logger::Duplicate::Info);
    }

    return logger.start()
        .with_context(|| format!("while starting logger (log dir {:?})", config.log_dir));
}

fn log_state(state: &structs::DisplayState) {
    match state {
        structs::DisplayState::Loading => info!("Display: loading"),
        structs::DisplayState::Normal(lines) => {
            for line in lines {
                info!("Display: |{}|", line.text());
            }
        },
        structs::DisplayState::Error(message) => warn!("Display (error): {}", message),
    }
}

fn run<D: display::CharacterDisplay>(config: &config::Config, device: D) -> result::BusDashResult<()> {
    let mut dash = busdash::connect(config.clone(), device)?;

    loop {
        let outcome = dash.run_once();
        log_state(dash.state());

        match config.interval {
            None => return outcome,
            Some(interval) => {
                if let Err(err) = outcome {
                    // Nothing left to show the error on.
                    if err.is_device() {
                        return Err(err);
                    }
                    warn!("Update failed, trying again in {:?}: {}", interval, err);
                }
                std::thread::sleep(interval);
            },
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args.get(0).cloned().unwrap_or("busdash".to_string());
    let rest = args.get(1..).unwrap_or(&[]);

    let config = match config::Config::from_args(&program, rest) {
        Ok(config::Parsed::Run(config)) => config,
        Ok(config::Parsed::Help(usage)) => {
            println!("{}", usage);
            return;
        },
        Err(err) => {
            eprintln!("{}\n\n{}", err, config::usage(&program));
            std::process::exit(2);
        },
    };

    let _logger = match init_logging(&config) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            std::process::exit(2);
        },
    };

    info!("Running. stop={} skip-display={} interval={:?}",
          config.stop_id, config.skip_display, config.interval);

    let outcome = if config.skip_display {
        run(&config, display::VirtualDisplay::new(config.columns, config.rows))
    } else {
        dothat::DotHat::new().and_then(|hat| run(&config, hat))
    };

    if let Err(err) = outcome {
        error!("Exiting: {}", err);
        std::process::exit(1);
    }
}
