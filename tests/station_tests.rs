//! Integration tests for the weighing pipeline and webhook pacing.

use rs_scale::hal::{MockClock, MockLoadCell, MockStationDisplay};
use rs_scale::scale::{CellCalibration, Scale, CELL_COUNT};
use rs_scale::station::{WebhookScheduler, WeighStation};
use rs_scale::traits::Clock;

fn cells_reading(raw: i32) -> [MockLoadCell; CELL_COUNT] {
    core::array::from_fn(|_| MockLoadCell::with_reading(raw))
}

fn calibrated(offset: f64, scale: f64) -> [CellCalibration; CELL_COUNT] {
    [CellCalibration { offset, scale }; CELL_COUNT]
}

// ============================================================================
// Acquisition pipeline
// ============================================================================

#[test]
fn full_pipeline_from_raw_counts_to_display() {
    // 420 counts per gram, tare baseline of 8400 counts
    let scale = Scale::new(cells_reading(428_400), calibrated(8_400.0, 420.0));
    let mut station = WeighStation::new(scale, Some(MockStationDisplay::new()));

    let reading = station.read();
    assert!((reading.total_grams - 4_000.0).abs() < 1e-6);
    assert!(reading.all_valid());

    station.render(&reading).unwrap();
}

#[test]
fn dead_channel_degrades_without_stopping() {
    let mut cells = cells_reading(420);
    cells[2].queue_failure();
    let scale = Scale::new(cells, calibrated(0.0, 4.2));
    let mut station = WeighStation::new(scale, Some(MockStationDisplay::new()));

    let reading = station.read();
    assert_eq!(reading.valid, [true, true, false, true]);
    assert_eq!(reading.cells[2], 0.0);
    assert!((reading.total_grams - 300.0).abs() < 1e-6);

    // The channel recovers on the next tick
    let reading = station.read();
    assert!(reading.all_valid());
    assert!((reading.total_grams - 400.0).abs() < 1e-6);
}

#[test]
fn display_receives_each_rendered_snapshot() {
    let scale = Scale::new(cells_reading(1_500), calibrated(0.0, 1.0));
    let mut station = WeighStation::new(scale, Some(MockStationDisplay::new()));

    for _ in 0..3 {
        let reading = station.read();
        station.render(&reading).unwrap();
    }

    station.shutdown().unwrap();
    assert!(!station.has_display());
}

#[test]
fn render_failure_does_not_poison_the_station() {
    let scale = Scale::new(cells_reading(100), calibrated(0.0, 1.0));
    let mut display = MockStationDisplay::new();
    display.fail_next = true;
    let mut station = WeighStation::new(scale, Some(display));

    let reading = station.read();
    assert!(station.render(&reading).is_err());
    // Next tick renders normally
    assert!(station.render(&reading).is_ok());
}

// ============================================================================
// Webhook pacing against a controlled clock
// ============================================================================

#[test]
fn scheduler_paces_sends_over_simulated_time() {
    let mut clock = MockClock::new();
    let mut scheduler = WebhookScheduler::new(5_000);

    let mut sends = 0;
    // 40 ticks of the 500ms polling loop = 20 seconds
    for _ in 0..40 {
        if scheduler.due(clock.now_ms()) {
            scheduler.mark_sent(clock.now_ms());
            sends += 1;
        }
        clock.advance(500);
    }

    // One immediate send, then one per 5s interval
    assert_eq!(sends, 4);
    assert_eq!(scheduler.sent_count(), 4);
}

#[test]
fn scheduler_does_not_burst_after_a_stall() {
    let mut clock = MockClock::new();
    let mut scheduler = WebhookScheduler::new(5_000);

    scheduler.mark_sent(clock.now_ms());
    // Loop stalls for three intervals
    clock.advance(15_000);

    assert!(scheduler.due(clock.now_ms()));
    scheduler.mark_sent(clock.now_ms());
    // Only one catch-up send, the next is a full interval away
    assert!(!scheduler.due(clock.now_ms() + 4_999));
    assert!(scheduler.due(clock.now_ms() + 5_000));
}

// ============================================================================
// Telemetry reports
// ============================================================================

#[cfg(feature = "json")]
mod telemetry {
    use super::*;
    use rs_scale::hal::MockWebhook;
    use rs_scale::messages::WeightReport;
    use rs_scale::traits::WebhookClient;

    #[test]
    fn report_built_from_live_reading() {
        let mut scale = Scale::new(cells_reading(2_000), calibrated(0.0, 2.0));
        let reading = scale.read();

        let report =
            WeightReport::from_reading(&reading, "2024-06-01T12:30:00".into(), "pi_zero_scale_001");

        assert_eq!(report.total_weight_grams, 4000.0);
        assert_eq!(report.total_weight_kg, 4.0);
        assert_eq!(report.sensors.len(), 4);
        assert_eq!(report.sensors[0].weight_grams, 1000.0);
        assert_eq!(report.device_id, "pi_zero_scale_001");
    }

    #[test]
    fn webhook_receives_reports_and_reports_status() {
        let mut webhook = MockWebhook::new();
        webhook.status = 204;

        let mut scale = Scale::new(cells_reading(500), calibrated(0.0, 1.0));
        let report = WeightReport::from_reading(&scale.read(), "t".into(), "dev");

        assert_eq!(webhook.send_report(&report), Ok(204));
        assert_eq!(webhook.delivered.len(), 1);
        assert_eq!(webhook.delivered[0].total_weight_grams, 2000.0);
    }

    #[test]
    fn webhook_transport_failure_surfaces() {
        let mut webhook = MockWebhook::new();
        webhook.fail = true;

        let mut scale = Scale::new(cells_reading(1), calibrated(0.0, 1.0));
        let report = WeightReport::from_reading(&scale.read(), "t".into(), "dev");

        assert!(webhook.send_report(&report).is_err());
        assert!(webhook.delivered.is_empty());
    }
}
