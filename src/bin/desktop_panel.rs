//! Desktop call panel bridged to an MQTT broker.
//!
//! Runs one panel in the terminal. Every node on the broker topic (other
//! panels, the elevator controller) plays the part of the radio channel.
//!
//! # Usage
//!
//! ```sh
//! RUST_LOG=info cargo run --bin desktop_panel --features mqtt
//! ```
//!
//! Type a line and press enter:
//!
//! - `a` / `down`: press the down button
//! - `b` / `up`: press the up button
//! - `fault` / `normal`: change the panel status
//! - `play <cue>`: play a named audio cue (`play buttonClick`)
//!
//! # Configuration
//!
//! Starts from `Config::default()`. These environment variables override it:
//!
//! - `COP_FLOOR`: floor number (default 1)
//! - `COP_CLIENT_ID`: MQTT client id, also the packet sender (default `microbit-cop`)
//! - `MQTT_HOST`, `MQTT_PORT`: broker address (default `localhost:1883`)

use std::io::BufRead;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use microbit_cop::hal::{ChannelButtons, ConsoleAudio, ConsoleDisplay};
use microbit_cop::services::{MqttRadio, MqttRuntimeConfig, SharedPanel};
use microbit_cop::traits::{AudioCue, AudioOutput, Button};
use microbit_cop::{CallPanel, Config, MqttConfig, PanelConfig, PanelOutcome, PanelStatus};

/// Main loop tick.
const TICK: Duration = Duration::from_millis(20);

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn load_config() -> anyhow::Result<Config> {
    let mut panel = PanelConfig::default();
    if let Some(floor) = env_var("COP_FLOOR") {
        let floor = floor
            .trim()
            .parse()
            .with_context(|| format!("COP_FLOOR is not a floor number: {floor}"))?;
        panel = panel.with_floor_number(floor);
    }

    let mut mqtt = MqttConfig::default();
    if let Some(host) = env_var("MQTT_HOST") {
        mqtt = mqtt.with_host(&host);
    }
    if let Some(port) = env_var("MQTT_PORT") {
        let port = port
            .trim()
            .parse()
            .with_context(|| format!("MQTT_PORT is not a port: {port}"))?;
        mqtt = mqtt.with_port(port);
    }
    if let Some(id) = env_var("COP_CLIENT_ID") {
        mqtt = mqtt.with_client_id(&id);
    }

    let config = Config::default().with_panel(panel).with_mqtt(mqtt);
    config.validate()?;
    Ok(config)
}

/// One line of terminal input.
enum Input {
    Press(Button),
    Status(PanelStatus),
    Play(AudioCue),
}

fn parse_input(line: &str) -> Option<Input> {
    if let Some(button) = Button::from_text(line) {
        return Some(Input::Press(button));
    }
    if let Some(name) = line.trim().strip_prefix("play ") {
        return AudioCue::from_name(name.trim()).map(Input::Play);
    }
    match line.trim().to_ascii_lowercase().as_str() {
        "fault" => Some(Input::Status(PanelStatus::OutOfOrder)),
        "normal" => Some(Input::Status(PanelStatus::Normal)),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    if !config.mqtt.enabled {
        bail!("the MQTT bridge is disabled, nothing to run");
    }

    let (radio, eventloop) = MqttRadio::connect(MqttRuntimeConfig::from_config(&config.mqtt))
        .await
        .context("failed to set up the MQTT radio")?;

    let panel = CallPanel::new(radio, ConsoleAudio, ConsoleDisplay::new(), &config)?;
    let shared = Arc::new(SharedPanel::new(panel));
    shared.with_panel(|panel| panel.start())?;

    info!(
        floor = config.panel.floor_number,
        "type a/down, b/up, fault, normal or play <cue>"
    );

    let (tx, rx) = mpsc::channel();
    let mut buttons = ChannelButtons::new(rx);
    {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_input(&line) {
                    Some(Input::Press(button)) => {
                        if tx.send(button).is_err() {
                            break;
                        }
                    }
                    Some(Input::Status(status)) => {
                        if let Err(e) = shared.with_panel(|panel| panel.set_status(status)) {
                            warn!(error = %e, "status change failed");
                        }
                    }
                    Some(Input::Play(cue)) => {
                        if let Err(e) = shared.with_panel(|panel| panel.audio_mut().play(cue)) {
                            warn!(error = %e, "audio failed");
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "unknown input"),
                }
            }
        });
    }

    let mut ticker = tokio::time::interval(TICK);
    while !buttons.is_disconnected() {
        ticker.tick().await;
        loop {
            match shared.with_panel(|panel| panel.poll(&mut buttons)) {
                Ok(Some(PanelOutcome::Ignored)) | Ok(Some(PanelOutcome::CallSent(_))) => {}
                Ok(Some(PanelOutcome::Acknowledged { floor, direction })) => {
                    info!(?floor, ?direction, "elevator acknowledged");
                }
                Ok(None) => break,
                Err(e) => warn!(error = %e, "event failed"),
            }
        }
    }

    let state = shared.state();
    info!(
        down = state.pending.down,
        up = state.pending.up,
        uptime_ms = shared.uptime_ms(),
        "input closed, shutting down"
    );
    eventloop.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_presses_and_status() {
        assert!(matches!(parse_input("a"), Some(Input::Press(Button::A))));
        assert!(matches!(parse_input(" up "), Some(Input::Press(Button::B))));
        assert!(matches!(
            parse_input("FAULT"),
            Some(Input::Status(PanelStatus::OutOfOrder))
        ));
        assert!(matches!(
            parse_input("normal"),
            Some(Input::Status(PanelStatus::Normal))
        ));
        assert!(parse_input("c").is_none());
    }

    #[test]
    fn parse_play_resolves_cue_names() {
        assert!(matches!(
            parse_input("play buttonClick"),
            Some(Input::Play(AudioCue::ButtonClick))
        ));
        assert!(matches!(
            parse_input("play buttonClick-loud"),
            Some(Input::Play(AudioCue::ButtonClick))
        ));
        assert!(parse_input("play chime").is_none());
        assert!(parse_input("play").is_none());
    }
}
