// Display-o-Tron HAT: an ST7036 3x16 character LCD on SPI, with the
// backlight driven by an SN3218 18-channel LED driver on I2C.
extern crate rppal;
extern crate std;

use rppal::gpio::OutputPin;
use rppal::i2c::I2c;
use rppal::spi::Spi;

use crate::display::CharacterDisplay;
use crate::result;
use crate::structs::Rgb;

const REGISTER_SELECT_PIN : u8 = 25;
const RESET_PIN : u8 = 12;
const SPI_CLOCK_HZ : u32 = 1000000;

// Each row starts 16 DDRAM addresses after the previous one.
const ROW_STRIDE : usize = 0x10;
pub const COLUMNS : usize = 16;
pub const ROWS : usize = 3;

const CLEAR_DISPLAY : u8 = 0x01;
const RETURN_HOME : u8 = 0x02;
const ENTRY_MODE_INCREMENT : u8 = 0x06;
const DISPLAY_ON : u8 = 0x0C;
const SET_DDRAM_ADDRESS : u8 = 0x80;

// 8 bit bus, two/three line mode. OR'd with the instruction table.
const FUNCTION_SET : u8 = 0x38;
const INSTRUCTION_TABLE_1 : u8 = 0x01;
const BIAS_SET : u8 = 0x14;
const POWER_ICON_CONTRAST : u8 = 0x54;
const FOLLOWER_CONTROL : u8 = 0x6B;
const CONTRAST_SET : u8 = 0x70;
const DEFAULT_CONTRAST : u8 = 40;

const SN3218_ADDRESS : u16 = 0x54;
const SN3218_ENABLE_OUTPUT : u8 = 0x00;
const SN3218_SET_PWM_VALUES : u8 = 0x01;
const SN3218_ENABLE_LEDS : u8 = 0x13;
const SN3218_UPDATE : u8 = 0x16;
const SN3218_RESET : u8 = 0x17;
const SN3218_CHANNELS : usize = 18;

pub struct DotHat {
    spi: Spi,
    register_select: OutputPin,
    _reset: OutputPin,
    instruction_table: Option<u8>,
    backlight: I2c,
    gamma: [u8; 256],
}

impl DotHat {
    pub fn new() -> result::BusDashResult<DotHat> {
        let gpio = rppal::gpio::Gpio::new()?;
        let register_select = gpio.get(REGISTER_SELECT_PIN)?.into_output();
        let mut reset = gpio.get(RESET_PIN)?.into_output();

        // Don't forget to enable SPI and I2C with sudo raspi-config
        let spi = rppal::spi::Spi::new(
            rppal::spi::Bus::Spi0,
            rppal::spi::SlaveSelect::Ss0,
            SPI_CLOCK_HZ,
            rppal::spi::Mode::Mode0)?;

        let mut backlight = I2c::new()?;
        backlight.set_slave_address(SN3218_ADDRESS)?;

        reset.set_low();
        std::thread::sleep(std::time::Duration::from_millis(1));
        reset.set_high();
        std::thread::sleep(std::time::Duration::from_millis(1));

        let mut hat = DotHat{
            spi: spi,
            register_select: register_select,
            _reset: reset,
            instruction_table: None,
            backlight: backlight,
            gamma: gamma_table(),
        };

        hat.init_lcd()?;
        hat.init_backlight()?;
        debug!("Display-o-Tron HAT initialised");

        return Ok(hat);
    }

    fn init_lcd(&mut self) -> result::BusDashResult<()> {
        self.send_command(DISPLAY_ON, 0)?;
        self.send_command(ENTRY_MODE_INCREMENT, 0)?;

        self.send_command(BIAS_SET | 0x01, INSTRUCTION_TABLE_1)?;
        self.send_command(POWER_ICON_CONTRAST | ((DEFAULT_CONTRAST >> 4) & 0x03), INSTRUCTION_TABLE_1)?;
        self.send_command(FOLLOWER_CONTROL, INSTRUCTION_TABLE_1)?;
        self.send_command(CONTRAST_SET | (DEFAULT_CONTRAST & 0x0F), INSTRUCTION_TABLE_1)?;

        return self.clear();
    }

    fn init_backlight(&mut self) -> result::BusDashResult<()> {
        self.write_backlight(SN3218_RESET, &[0xFF])?;
        self.write_backlight(SN3218_ENABLE_OUTPUT, &[0x01])?;
        // Three banks of six channels, all on.
        self.write_backlight(SN3218_ENABLE_LEDS, &[0x3F, 0x3F, 0x3F])?;
        return self.write_backlight(SN3218_UPDATE, &[0xFF]);
    }

    fn spi_write(&mut self, byte: u8) -> result::BusDashResult<()> {
        let bytes = self.spi.write(&[byte])?;
        if bytes != 1 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero, "short SPI write").into());
        }
        return Ok(());
    }

    // The extended commands live in a separate instruction table, selected
    // by the low bits of a function set.
    fn select_instruction_table(&mut self, table: u8) -> result::BusDashResult<()> {
        if self.instruction_table != Some(table) {
            self.spi_write(FUNCTION_SET | table)?;
            std::thread::sleep(std::time::Duration::from_micros(60));
            self.instruction_table = Some(table);
        }
        return Ok(());
    }

    fn send_command(&mut self, command: u8, table: u8) -> result::BusDashResult<()> {
        self.register_select.set_low();
        self.select_instruction_table(table)?;
        self.spi_write(command)?;
        std::thread::sleep(std::time::Duration::from_micros(60));
        return Ok(());
    }

    fn send_data(&mut self, data: u8) -> result::BusDashResult<()> {
        self.register_select.set_high();
        self.spi_write(data)?;
        std::thread::sleep(std::time::Duration::from_micros(50));
        return Ok(());
    }

    fn write_backlight(&mut self, register: u8, data: &[u8]) -> result::BusDashResult<()> {
        let mut buffer = Vec::with_capacity(data.len() + 1);
        buffer.push(register);
        buffer.extend_from_slice(data);
        self.backlight.write(&buffer)?;
        return Ok(());
    }
}

impl CharacterDisplay for DotHat {
    fn clear(&mut self) -> result::BusDashResult<()> {
        self.send_command(CLEAR_DISPLAY, 0)?;
        std::thread::sleep(std::time::Duration::from_micros(1500));
        self.send_command(RETURN_HOME, 0)?;
        return Ok(());
    }

    fn set_cursor(&mut self, column: usize, row: usize) -> result::BusDashResult<()> {
        let address = ddram_address(column, row);
        return self.send_command(SET_DDRAM_ADDRESS | address, 0);
    }

    fn write(&mut self, text: &str) -> result::BusDashResult<()> {
        for byte in lcd_bytes(text) {
            self.send_data(byte)?;
        }
        return Ok(());
    }

    fn set_backlight(&mut self, color: Rgb) -> result::BusDashResult<()> {
        let values = backlight_channels(color, &self.gamma);
        self.write_backlight(SN3218_SET_PWM_VALUES, &values)?;
        return self.write_backlight(SN3218_UPDATE, &[0xFF]);
    }
}

fn ddram_address(column: usize, row: usize) -> u8 {
    let column = std::cmp::min(column, COLUMNS - 1);
    let row = std::cmp::min(row, ROWS - 1);
    return (row * ROW_STRIDE + column) as u8;
}

// The character ROM only agrees with ASCII.
fn lcd_bytes(text: &str) -> Vec<u8> {
    return text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect();
}

// Six zones of three channels each, wired blue, green, red.
fn backlight_channels(color: Rgb, gamma: &[u8; 256]) -> [u8; SN3218_CHANNELS] {
    let mut values = [0u8; SN3218_CHANNELS];
    for zone in values.chunks_mut(3) {
        zone[0] = gamma[color.b as usize];
        zone[1] = gamma[color.g as usize];
        zone[2] = gamma[color.r as usize];
    }
    return values;
}

fn gamma_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = 255f32.powf((i as f32 - 1.0) / 255.0) as u8;
    }
    return table;
}
