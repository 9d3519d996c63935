mod common;

use common::{disk, process, FakeSource};
use tm_config::TaskConfig;
use tm_core::state::MemoryInfo;
use tm_core::{ChartSurface, RefreshInterval, Tab, TerminateError};
use tm_monitor::Controller;
use tm_renderer::DrawOp;
use tm_system::memory::bytes_to_mb;
use tm_system::TerminationSignal;

fn controller(source: FakeSource) -> Controller<FakeSource> {
    Controller::with_user(source, &TaskConfig::default(), "alice")
}

fn on_tab(source: FakeSource, tab: Tab) -> Controller<FakeSource> {
    let mut config = TaskConfig::default();
    config.general.initial_tab = tab;
    Controller::with_user(source, &config, "alice")
}

#[test]
fn every_tick_appends_cpu_and_memory() {
    let mut source = FakeSource { cpu: 42.0, ..FakeSource::default() };
    source.memory = MemoryInfo::from_totals(1_000, 500, 250);
    let mut c = controller(source);

    for _ in 0..3 {
        assert_eq!(c.tick(), vec![ChartSurface::Performance]);
    }

    assert_eq!(c.cpu_history().values(), vec![42.0; 3]);
    assert_eq!(c.memory_history().latest(), Some(75.0));
    assert_eq!(c.cpu_info().model, "Fake CPU");
    // Performance tab: the process table is left alone.
    assert_eq!(c.source().process_polls, 0);
}

#[test]
fn performance_history_keeps_the_last_sixty_samples() {
    let mut c = controller(FakeSource::default());
    for i in 0..70 {
        c.source_mut().cpu = i as f32;
        c.tick();
    }
    let values = c.cpu_history().values();
    assert_eq!(values.len(), 60);
    assert_eq!(values.first(), Some(&10.0));
    assert_eq!(values.last(), Some(&69.0));
}

#[test]
fn visible_tab_decides_what_else_is_sampled() {
    let mut c = on_tab(FakeSource::default(), Tab::Processes);
    c.tick();
    assert_eq!(c.source().process_polls, 1);
    assert_eq!(c.source().session_polls, 0);

    c.set_tab(Tab::Users);
    assert_eq!(c.source().session_polls, 1);
    c.tick();
    assert_eq!(c.source().session_polls, 2);
    assert_eq!(c.host().map(|h| h.hostname.as_str()), Some("testhost"));

    let mut disks = on_tab(FakeSource::default(), Tab::Disks);
    assert_eq!(
        disks.tick(),
        vec![ChartSurface::Performance, ChartSurface::DiskUsage, ChartSurface::DiskIo]
    );
}

#[test]
fn io_rate_follows_counter_deltas_over_the_interval() {
    let mut source = FakeSource::default();
    source.partitions = vec![disk("/dev/sda1", "/", 100, 40)];
    source.set_sectors("sda", 1_000, 2_000);
    let mut c = on_tab(source, Tab::Disks);

    c.tick();
    assert!(c.selected_io_history().is_none());

    c.source_mut().set_sectors("sda", 3_000, 2_500);
    c.tick();

    let rate = c.selected_io_rate().unwrap();
    assert_eq!(rate.read_bytes_per_sec, 2_000.0 * 512.0 / 2.0);
    assert_eq!(rate.write_bytes_per_sec, 500.0 * 512.0 / 2.0);

    let history = c.selected_io_history().unwrap();
    assert_eq!(history.read.latest(), Some(bytes_to_mb(512_000.0)));
    assert_eq!(history.write.len(), 1);
}

#[test]
fn counter_rollback_skips_one_interval() {
    let mut source = FakeSource::default();
    source.partitions = vec![disk("/dev/sda1", "/", 100, 40)];
    source.set_sectors("sda", 1_000, 1_000);
    let mut c = on_tab(source, Tab::Disks);

    c.tick();
    c.source_mut().set_sectors("sda", 2_000, 2_000);
    c.tick();
    c.source_mut().set_sectors("sda", 10, 2_100);
    c.tick();
    assert_eq!(c.selected_io_history().unwrap().read.len(), 1);

    // The rolled-back snapshot is the new baseline.
    c.source_mut().set_sectors("sda", 20, 2_200);
    c.tick();
    assert_eq!(c.selected_io_history().unwrap().read.len(), 2);
}

#[test]
fn interval_change_restarts_the_io_baseline() {
    let mut source = FakeSource::default();
    source.partitions = vec![disk("/dev/sda1", "/", 100, 40)];
    source.set_sectors("sda", 0, 0);
    let mut c = on_tab(source, Tab::Disks);

    c.tick();
    c.source_mut().set_sectors("sda", 4_096, 0);
    c.tick();
    assert_eq!(c.selected_io_history().unwrap().read.len(), 1);

    // Counters keep climbing while the old period runs out.
    c.source_mut().set_sectors("sda", 40_960, 0);
    c.set_interval(RefreshInterval::One);
    assert!(c.selected_io_rate().is_none());

    c.tick();
    assert_eq!(c.selected_io_history().unwrap().read.len(), 1);
    assert!(c.selected_io_rate().is_none());

    c.source_mut().set_sectors("sda", 43_008, 0);
    c.tick();
    let rate = c.selected_io_rate().unwrap();
    assert_eq!(rate.read_bytes_per_sec, 2_048.0 * 512.0 / 1.0);
    assert_eq!(c.selected_io_history().unwrap().read.values(), vec![1.0, 1.0]);
}

#[test]
fn broken_io_counters_do_not_stop_the_tick() {
    let source = FakeSource { cpu: 5.0, io_broken: true, ..FakeSource::default() };
    let mut c = controller(source);
    c.tick();
    assert_eq!(c.cpu_history().latest(), Some(5.0));
    assert!(c.selected_io_rate().is_none());
}

#[test]
fn selected_disk_survives_refresh_and_falls_back_when_gone() {
    let mut source = FakeSource::default();
    source.partitions = vec![disk("/dev/sda1", "/", 100, 40), disk("/dev/sdb1", "/data", 100, 90)];
    let mut c = on_tab(source, Tab::Disks);

    c.tick();
    assert_eq!(c.selected_disk().map(|d| d.device.as_str()), Some("/dev/sda1"));

    assert!(c.select_disk("/dev/sdb1"));
    c.tick();
    assert_eq!(c.selected_disk().map(|d| d.device.as_str()), Some("/dev/sdb1"));

    c.source_mut().partitions.truncate(1);
    c.tick();
    assert_eq!(c.selected_disk().map(|d| d.device.as_str()), Some("/dev/sda1"));

    c.source_mut().partitions.clear();
    c.tick();
    assert!(c.selected_disk().is_none());
    let ops = c.draw(ChartSurface::DiskUsage, 200.0, 200.0);
    assert!(ops.iter().any(|op| matches!(op, DrawOp::CenteredText { .. })));
}

#[test]
fn unknown_disks_cannot_be_selected() {
    let mut source = FakeSource::default();
    source.partitions = vec![disk("/dev/sda1", "/", 100, 40)];
    let mut c = on_tab(source, Tab::Disks);
    c.tick();

    assert!(!c.select_disk("/dev/sdz9"));
    assert_eq!(c.selected_disk().map(|d| d.device.as_str()), Some("/dev/sda1"));
}

#[test]
fn process_tables_follow_filter_and_system_toggle() {
    let mut source = FakeSource::default();
    source.processes = vec![
        process(1, "bash", "alice"),
        process(2, "sshd", "bob"),
        process(3, "Bashtop", "bob"),
        process(4, "vim", "alice"),
    ];
    let mut c = on_tab(source, Tab::Processes);
    c.tick();
    assert_eq!(c.processes().mine.len(), 2);
    assert_eq!(c.processes().others.len(), 2);

    c.set_show_system(false);
    assert!(c.processes().others.is_empty());
    assert!(c.processes().mine.iter().all(|row| row.user == "alice"));

    c.set_show_system(true);
    c.set_process_query("BASH");
    let pids: Vec<u32> = c.processes().mine.iter().chain(&c.processes().others).map(|r| r.pid).collect();
    assert_eq!(pids, [1, 3]);
    // Filtering reuses the last listing.
    assert_eq!(c.source().process_polls, 1);
}

#[test]
fn terminate_reports_the_process_and_refreshes() {
    let mut source = FakeSource::default();
    source.processes = vec![process(7, "sleep", "alice"), process(8, "top", "alice")];
    let mut c = on_tab(source, Tab::Processes);
    c.tick();

    c.terminate(7, "sigterm").unwrap();
    assert_eq!(c.source().terminated, vec![(7, TerminationSignal::Term)]);
    assert_eq!(c.take_status().as_deref(), Some("Process sleep (PID: 7) terminated"));
    assert!(c.processes().find(7).is_none());
    assert!(c.take_status().is_none());
}

#[test]
fn terminate_failures_are_returned_unchanged() {
    let mut c = controller(FakeSource::default());

    let err = c.terminate(9, "KILL").unwrap_err();
    assert!(matches!(err, TerminateError::Other { pid: 9, .. }));
    assert!(c.source().terminated.is_empty());

    c.source_mut().refuse = Some(TerminateError::PermissionDenied(1));
    assert_eq!(c.terminate(1, "TERM"), Err(TerminateError::PermissionDenied(1)));

    c.source_mut().refuse = Some(TerminateError::NotFound(99));
    assert_eq!(c.terminate(99, "HUP"), Err(TerminateError::NotFound(99)));
    assert!(c.take_status().is_none());
}

#[test]
fn interval_change_posts_status_without_sampling() {
    let mut c = controller(FakeSource::default());
    c.set_interval(RefreshInterval::Five);

    assert_eq!(c.interval(), RefreshInterval::Five);
    assert_eq!(c.take_status().as_deref(), Some("Update interval changed to 5 second(s)"));
    assert!(c.cpu_history().is_empty());
}

#[test]
fn manual_refresh_samples_every_category() {
    let mut c = controller(FakeSource::default());
    let dirty = c.refresh_all();

    assert_eq!(dirty.len(), 3);
    assert_eq!(c.source().process_polls, 1);
    assert_eq!(c.source().session_polls, 1);
    assert_eq!(c.cpu_history().len(), 1);
    assert_eq!(c.take_status().as_deref(), Some("Data refreshed"));
}

#[test]
fn reloaded_config_updates_interval_filter_and_theme() {
    let mut c = controller(FakeSource::default());
    let cfg = tm_config::parse(
        r##"
        [general]
        refresh_interval = 10
        show_system_processes = false

        [theme]
        cpu = "#ff0000"
        "##,
    )
    .unwrap();

    c.apply_config(&cfg);
    assert_eq!(c.interval(), RefreshInterval::Ten);
    assert!(!c.filter().show_system);
    assert_eq!(c.theme().cpu, tm_theme::Color::rgb(1.0, 0.0, 0.0));
}

const GIB: u64 = 1 << 30;

#[test]
fn detail_lines_follow_sampled_categories() {
    let mut source = FakeSource { cpu: 25.0, ..FakeSource::default() };
    source.memory = MemoryInfo::from_totals(2 * GIB, GIB, GIB);
    let mut c = controller(source);
    c.tick();

    assert_eq!(
        c.detail_lines(),
        [
            "Model: Fake CPU",
            "Cores: 4 (Physical: unknown)",
            "Total: 2.00 GB",
            "Used: 1.00 GB (50.0%)",
            "Available: 1.00 GB",
        ]
    );
    assert_eq!(c.tick_summary(), "CPU 25.0% | Memory 50.0% (1.0 GiB / 2.0 GiB) | 0 processes");

    c.set_tab(Tab::Users);
    let lines = c.detail_lines();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[5], "Uptime: 0 days, 0 hours, 0 minutes");
    assert!(lines[6].starts_with("Boot Time: "));
    assert_eq!(lines[7], "Load Average: 0.00, 0.00, 0.00");
}

#[test]
fn charts_render_from_current_histories() {
    let mut c = controller(FakeSource { cpu: 50.0, ..FakeSource::default() });
    c.tick();
    c.tick();

    let ops = c.draw(ChartSurface::Performance, 590.0, 300.0);
    assert!(ops.iter().any(|op| matches!(op, DrawOp::Polyline { .. })));
    assert!(c.draw(ChartSurface::DiskIo, 0.0, 100.0).is_empty());

    // No selected disk yet: frame and legend only.
    let io = c.draw(ChartSurface::DiskIo, 300.0, 100.0);
    assert!(!io.is_empty());
    assert!(!io.iter().any(|op| matches!(op, DrawOp::Polyline { .. })));
}

#[test]
fn snapshot_serializes_current_values() {
    let mut source = FakeSource { cpu: 12.5, ..FakeSource::default() };
    source.partitions = vec![disk("/dev/sda1", "/", 100, 40)];
    let mut c = controller(source);
    c.prime();

    let json = serde_json::to_value(c.snapshot()).unwrap();
    assert_eq!(json["cpu_percent"], 12.5);
    assert_eq!(json["selected_disk"], "/dev/sda1");
    assert_eq!(json["disks"][0]["percent"], 60.0);
    assert_eq!(json["interval_secs"], 2);
    assert_eq!(json["details"][0], "Model: Fake CPU");
}
