//! Edge case and boundary condition tests for the call panel

use microbit_cop::{
    hal::{MockAudio, MockDisplay, MockRadio},
    normalize,
    protocol::MAX_LABEL,
    traits::Button,
    BehaviorConfig, CallCodec, CallMessage, CallPanel, Config, ConfigError, Decoded, Direction,
    Fallback, IndicatorLayout, PanelConfig, PanelOutcome, PanelStatus, ProtocolConfig,
};

type TestPanel = CallPanel<MockRadio, MockAudio, MockDisplay>;

fn panel_with(config: Config) -> TestPanel {
    let mut panel = CallPanel::new(
        MockRadio::new(),
        MockAudio::new(),
        MockDisplay::new(),
        &config,
    )
    .unwrap();
    panel.start().unwrap();
    panel
}

fn floor(n: u16) -> Config {
    Config::default().with_panel(PanelConfig::default().with_floor_number(n))
}

// ============================================================================
// Normalizer Boundaries
// ============================================================================

#[test]
fn normalize_boundaries_inclusive() {
    assert_eq!(normalize(1.0), 1.0);
    assert_eq!(normalize(-1.0), -1.0);
    assert_eq!(normalize(1.0001), 1.0);
    assert_eq!(normalize(-1.0001), -1.0);
    assert_eq!(normalize(f64::MAX), 1.0);
    assert_eq!(normalize(f64::NEG_INFINITY), -1.0);
}

#[test]
fn normalize_zero_passes_through() {
    assert_eq!(normalize(0.0), 0.0);
    assert_eq!(normalize(0.999), 0.999);
    assert_eq!(normalize(-0.5), -0.5);
    assert!(normalize(f64::NAN).is_nan());
}

#[test]
fn near_one_stays_in_the_band() {
    // Rounds to 1.0 in single precision
    assert_eq!(normalize(0.999_999_99), 0.999_999_99);
    assert_eq!(normalize(-0.999_999_99), -0.999_999_99);
    assert_eq!(Fallback::PassThrough.direction(0.999_999_99), None);
}

#[test]
fn fallback_toward_closes_the_band() {
    let fallback = Fallback::Toward(Direction::Down);
    assert_eq!(fallback.normalize(0.0), -1.0);
    assert_eq!(fallback.normalize(0.9), -1.0);
    assert_eq!(fallback.normalize(f64::NAN), -1.0);
    assert_eq!(fallback.normalize(2.0), 1.0);
}

// ============================================================================
// Signals That Do Not Normalize
// ============================================================================

#[test]
fn zero_signal_sends_nothing_by_default() {
    let mut panel = panel_with(Config::default());

    assert_eq!(panel.call_signal(0.0).unwrap(), None);
    assert!(panel.radio().sent.is_empty());
    assert!(panel.audio().played.is_empty());
    assert!(panel.state().pending.is_idle());
}

#[test]
fn zero_signal_with_fallback_sends() {
    let config = Config::default().with_behavior(
        BehaviorConfig::default().with_fallback(Fallback::Toward(Direction::Up)),
    );
    let mut panel = panel_with(config);

    let sent = panel.call_signal(0.0).unwrap().unwrap();
    assert_eq!(sent.value(), 1);
    assert!(panel.state().pending.up);
}

#[test]
fn large_signal_is_clamped_before_sending() {
    let mut panel = panel_with(Config::default());
    panel.call_signal(-42.0).unwrap();
    assert_eq!(panel.radio().sent_values(), vec![("CP1call", -1)]);
}

#[test]
fn ack_with_zero_value_changes_nothing_but_renders() {
    let mut panel = panel_with(Config::default());
    let draws = panel.display().draws.len();

    let outcome = panel.on_receive("ACK1call", 0).unwrap();
    assert_eq!(
        outcome,
        PanelOutcome::Acknowledged {
            floor: Some(1),
            direction: None,
        }
    );
    assert!(panel.state().pending.is_idle());
    // One render: down then up on the shared LED
    assert_eq!(panel.display().draws.len(), draws + 2);
}

#[test]
fn ack_with_large_value_normalizes() {
    let mut panel = panel_with(Config::default());
    panel.on_receive("ACK1call", 5).unwrap();
    assert!(panel.state().pending.up);
    assert!(!panel.state().pending.down);
}

// ============================================================================
// Acknowledgment Matching
// ============================================================================

#[test]
fn ack_for_any_floor_applies() {
    let mut panel = panel_with(floor(3));

    let outcome = panel.on_receive("ACK7call", -1).unwrap();
    assert_eq!(
        outcome,
        PanelOutcome::Acknowledged {
            floor: Some(7),
            direction: Some(Direction::Down),
        }
    );
    assert!(panel.state().pending.down);
}

#[test]
fn ack_without_digits_still_matches() {
    let mut panel = panel_with(Config::default());
    let outcome = panel.on_receive("ACKcall", 1).unwrap();
    assert_eq!(
        outcome,
        PanelOutcome::Acknowledged {
            floor: None,
            direction: Some(Direction::Up),
        }
    );
}

#[test]
fn ack_substrings_anywhere_match() {
    let codec = CallCodec::default();
    assert!(codec.matches_ack(&CallMessage::new("callACK", 1)));
    assert!(codec.matches_ack(&CallMessage::new("xxACK12callyy", 1)));
    assert!(!codec.matches_ack(&CallMessage::new("ACK12", 1)));
    assert!(!codec.matches_ack(&CallMessage::new("ack1call", 1)));
    assert!(!codec.matches_ack(&CallMessage::new("", 1)));
}

#[test]
fn multi_digit_floors() {
    let mut panel = panel_with(floor(12));
    let sent = panel.on_press(Button::B).unwrap();
    assert_eq!(sent.label(), "CP12call");

    let codec = panel.codec();
    assert!(codec.matches_ack(&CallMessage::new("ACK12call", 1)));
    assert_eq!(
        codec.decode(&CallMessage::new("CP65535call", -1)),
        Decoded::CallRequest {
            floor: Some(65535),
            direction: Some(Direction::Down),
        }
    );
}

#[test]
fn other_panels_calls_are_ignored() {
    let mut panel = panel_with(Config::default());
    let outcome = panel.on_receive("CP1call", 1).unwrap();
    assert_eq!(outcome, PanelOutcome::Ignored);
    assert!(panel.state().pending.is_idle());
}

#[test]
fn overlong_label_is_truncated() {
    let long = "ACK1call".repeat(20);
    let msg = CallMessage::new(&long, 1);
    assert_eq!(msg.label().len(), MAX_LABEL);
    assert!(long.starts_with(msg.label()));

    let mut panel = panel_with(Config::default());
    panel.receive(msg).unwrap();
    assert!(panel.state().pending.up);
}

#[test]
fn ack_past_the_label_bound_still_matches() {
    let mut panel = panel_with(Config::default());
    let label = format!("{}ACK1call", "x".repeat(MAX_LABEL));

    let outcome = panel.on_receive(&label, 1).unwrap();
    assert_eq!(
        outcome,
        PanelOutcome::Acknowledged {
            floor: Some(1),
            direction: Some(Direction::Up),
        }
    );
    assert!(panel.state().pending.up);

    // Only the stored copy is cut
    let stored = panel.state().last_received.as_ref().unwrap();
    assert_eq!(stored.label().len(), MAX_LABEL);
    assert!(!stored.label().contains("ACK"));
}

#[test]
fn decode_label_ignores_the_bound() {
    let codec = CallCodec::default();
    let label = format!("{}CP9call", "y".repeat(MAX_LABEL + 1));
    assert_eq!(
        codec.decode_label(&label, -1),
        Decoded::CallRequest {
            floor: Some(9),
            direction: Some(Direction::Down),
        }
    );
    assert!(codec.matches_ack_label(&format!("{label}ACK")));
}

#[test]
fn send_buffer_tracks_last_encode() {
    let mut panel = panel_with(floor(4));
    panel.on_press(Button::A).unwrap();
    assert_eq!(panel.state().send_buffer, CallMessage::new("CP4call", -1));

    panel.on_press(Button::B).unwrap();
    assert_eq!(panel.state().send_buffer, CallMessage::new("CP4call", 1));
}

// ============================================================================
// Corrected Behavior Variants
// ============================================================================

#[test]
fn clear_on_ack_returns_to_idle() {
    let config =
        Config::default().with_behavior(BehaviorConfig::default().with_clear_on_ack(true));
    let mut panel = panel_with(config);

    panel.on_press(Button::A).unwrap();
    assert!(panel.state().pending.down);

    panel.on_receive("ACK1call", -1).unwrap();
    assert!(!panel.state().pending.down);
}

#[test]
fn render_on_press_draws_immediately() {
    let config = Config::default().with_behavior(
        BehaviorConfig::default()
            .with_render_on_press(true)
            .with_layout(IndicatorLayout::split()),
    );
    let mut panel = panel_with(config);
    let layout = IndicatorLayout::split();

    panel.on_press(Button::A).unwrap();
    assert!(panel.display().is_lit(layout.down));
    assert!(!panel.display().is_lit(layout.up));

    panel.on_press(Button::B).unwrap();
    assert!(panel.display().is_lit(layout.down));
    assert!(panel.display().is_lit(layout.up));
}

#[test]
fn out_of_order_from_config() {
    let config = Config::default()
        .with_panel(PanelConfig::default().with_status(PanelStatus::OutOfOrder));
    let panel = panel_with(config);

    assert!(panel.state().is_out_of_order());
    assert_eq!(panel.display().messages, vec!["OUT OF ORDER"]);
    assert_eq!(panel.display().lit_count(), 0);
}

// ============================================================================
// Configuration Rejections
// ============================================================================

#[test]
fn zero_floor_rejected() {
    let result = CallPanel::new(
        MockRadio::new(),
        MockAudio::new(),
        MockDisplay::new(),
        &floor(0),
    );
    assert!(matches!(result, Err(ConfigError::ZeroFloor)));
}

#[test]
fn ambiguous_prefixes_rejected() {
    let config = Config::default().with_protocol(
        ProtocolConfig::default()
            .with_call_prefix("ACKCP")
            .with_ack_prefix("ACK"),
    );
    assert_eq!(config.validate(), Err(ConfigError::AmbiguousPrefixes));
}

#[test]
fn empty_suffix_rejected() {
    let config = Config::default().with_protocol(ProtocolConfig::default().with_suffix(""));
    assert_eq!(config.validate(), Err(ConfigError::EmptyField("suffix")));
}
