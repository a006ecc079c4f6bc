//! Build script for cadence-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Loads and validates cadence.toml at compile time
//! - Generates `board.rs` (constants and pin macros) into OUT_DIR
//! - Selects the transport with a `transport` cfg

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use cadence_core::config::{DemoConfig, PinId, Transport};

/// USART instances reachable from each TX pin (AF7 on STM32H7)
const USART_TX_PINS: &[(&str, &str)] = &[
    ("PA9", "USART1"),
    ("PB6", "USART1"),
    ("PB14", "USART1"),
    ("PA2", "USART2"),
    ("PD5", "USART2"),
    ("PB10", "USART3"),
    ("PC10", "USART3"),
    ("PD8", "USART3"),
];

fn main() {
    setup_linker();
    let config = load_config();
    select_transport(&config);
    generate_board(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Load cadence.toml and validate it
fn load_config() -> DemoConfig {
    println!("cargo:rerun-if-changed=cadence.toml");

    let config_path = Path::new("cadence.toml");

    if !config_path.exists() {
        fail(
            "cadence.toml not found!",
            &[
                "The firmware requires a cadence.toml configuration file".to_string(),
                "in the cadence-firmware directory.".to_string(),
            ],
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read cadence.toml", &[format!("Error: {}", e)]),
    };

    let config: DemoConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail(
            "Invalid cadence.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    if let Err(e) = config.validate() {
        fail("Invalid timing configuration", &[e.to_string()]);
    }

    if config.transport == Transport::HardwareUart && usart_for(&config.pins.tx).is_none() {
        fail(
            "Invalid pin configuration",
            &[
                format!("tx = \"{}\" is not a USART TX pin", config.pins.tx),
                format!(
                    "hardware_uart supports: {}",
                    USART_TX_PINS
                        .iter()
                        .map(|(pin, _)| *pin)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ],
        );
    }

    let timing = &config.timing;
    println!(
        "cargo:warning=cadence.toml validated: {:?} at {} Hz, {} Bd ({} cycles/bit), {} us half-period ({} cycles)",
        config.transport,
        timing.clock_hz,
        timing.baudrate,
        timing.bit_period_cycles(),
        timing.half_period_us,
        timing.half_period_cycles(),
    );

    config
}

/// Emit the `transport` cfg that gates the demo in main.rs
fn select_transport(config: &DemoConfig) {
    println!(
        "cargo::rustc-check-cfg=cfg(transport, values(\"soft_spi\", \"soft_uart\", \"hardware_uart\"))"
    );
    let name = match config.transport {
        Transport::SoftSpi => "soft_spi",
        Transport::SoftUart => "soft_uart",
        Transport::HardwareUart => "hardware_uart",
    };
    println!("cargo:rustc-cfg=transport=\"{}\"", name);
}

/// Write constants and pin-taking macros for the selected board wiring
fn generate_board(config: &DemoConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let timing = &config.timing;
    let pins = &config.pins;

    let mut out = String::new();
    out.push_str("// Generated by build.rs from cadence.toml\n\n");
    out.push_str(&format!(
        "/// Payload sent every interval\npub const BYTE_TO_SEND: u8 = {:#04x};\n\n",
        config.byte_to_send
    ));
    out.push_str(&format!(
        "/// Outer loop period\npub const REPEAT_INTERVAL_MS: u64 = {};\n\n",
        config.repeat_interval_ms
    ));
    out.push_str(&format!(
        "/// Clock and bit-rate inputs\n\
         pub const TIMING: cadence_core::TimingConfig = cadence_core::TimingConfig {{\n    \
         clock_hz: {},\n    baudrate: {},\n    half_period_us: {},\n}};\n\n",
        timing.clock_hz, timing.baudrate, timing.half_period_us
    ));

    out.push_str(&format!(
        "/// Clock, data-out, data-in and select lines, at idle levels\n\
         macro_rules! sync_lines {{\n    ($p:ident) => {{\n        (\n            \
         {},\n            {},\n            {},\n            {},\n        )\n    }};\n}}\n\n",
        output(&pins.clock, "Low"),
        output(&pins.data_out, "Low"),
        input(&pins.data_in),
        output(&pins.select, "High"),
    ));
    out.push_str(&format!(
        "/// Software transmit line, idle high\n\
         macro_rules! tx_line {{\n    ($p:ident) => {{\n        {}\n    }};\n}}\n\n",
        output(&pins.tx, "High"),
    ));
    if let Some(usart) = usart_for(&pins.tx) {
        out.push_str(&format!(
            "/// USART instance and its TX pin\n\
             macro_rules! usart_parts {{\n    ($p:ident) => {{\n        ($p.{}, $p.{})\n    }};\n}}\n",
            usart, pins.tx
        ));
    }

    fs::write(out_dir.join("board.rs"), out).unwrap();
}

fn output(pin: &PinId, level: &str) -> String {
    format!(
        "embassy_stm32::gpio::Output::new($p.{}, embassy_stm32::gpio::Level::{}, embassy_stm32::gpio::Speed::VeryHigh)",
        pin, level
    )
}

fn input(pin: &PinId) -> String {
    format!(
        "embassy_stm32::gpio::Input::new($p.{}, embassy_stm32::gpio::Pull::Up)",
        pin
    )
}

fn usart_for(pin: &PinId) -> Option<&'static str> {
    let name = pin.to_string();
    USART_TX_PINS
        .iter()
        .find(|(tx, _)| *tx == name)
        .map(|(_, usart)| *usart)
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
