mod common;

use common::fakes::{FakeHost, Step};
use common::fixtures::{GB, all_config, collaborators, config, run, with_operation, with_sizing};
use storage_backup::{BatchResult, ResolveError};
use storage_types::Operation;

#[test]
fn single_volume_backup_succeeds_end_to_end() {
    let host = FakeHost::new().with_mounted_volume("vg0", "lv0", 100 * GB, 50 * GB);
    let config = with_sizing(with_operation(all_config(), Operation::Full), 4, 0, 0);
    let result = run(&config, &host);

    assert_eq!(
        result,
        BatchResult {
            status: 0,
            processed: 1,
            succeeded: 1,
            skipped: 0,
            failed: 0,
        }
    );
    assert_eq!(
        host.calls_to("create"),
        ["create /dev/vg0/lv0 24414062 lv0-snapshot"]
    );
}

#[test]
fn unmounted_volume_is_skipped_silently_in_all_mode() {
    let host = FakeHost::new().with_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&all_config(), &host);

    assert_eq!(result.status, 0);
    assert_eq!(result.skipped, 1);
    assert!(host.calls().is_empty());
}

#[test]
fn unmounted_volume_is_a_failure_when_named() {
    let host = FakeHost::new().with_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&config(&["/dev/vg0/lv0"]), &host);

    assert_eq!(result.status, 1);
    assert_eq!(result.skipped, 1);
    assert!(host.calls().is_empty());
}

#[test]
fn swap_volume_is_never_snapshotted() {
    let host = FakeHost::new()
        .with_volume("vg0", "swap", 4 * GB, 10 * GB)
        .with_mount("/dev/mapper/vg0-swap", "none", "swap", "sw");

    let quiet = run(&all_config(), &host);
    assert_eq!(quiet.status, 0);
    assert_eq!(quiet.skipped, 1);

    let named = run(&config(&["/dev/vg0/swap"]), &host);
    assert_eq!(named.status, 1);

    assert_eq!(host.count("create"), 0);
}

#[test]
fn maintenance_runs_report_unmounted_volumes_even_in_all_mode() {
    let host = FakeHost::new().with_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&with_operation(all_config(), Operation::Verify), &host);

    assert_eq!(result.status, 1);
    assert!(host.tool_runs().is_empty());
}

#[test]
fn unknown_device_is_reported_and_skipped() {
    let host = FakeHost::new().with_mounted_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&config(&["/dev/sdz1", "/dev/vg0/lv0"]), &host);

    assert_eq!(result.status, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(host.count("create"), 1);
}

#[test]
fn one_failing_volume_does_not_stop_the_batch() {
    let host = FakeHost::new()
        .with_mounted_volume("vg0", "alpha", 10 * GB, 10 * GB)
        .with_mounted_volume("vg0", "beta", 10 * GB, 10 * GB)
        .tool_exit("vg0-alpha", 30);
    let result = run(&all_config(), &host);

    assert_eq!(result.status, 30);
    assert_eq!(result.failed, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(host.tool_runs().len(), 2);
    assert_eq!(host.count("remove"), 2);
}

#[test]
fn last_non_zero_status_wins() {
    let host = FakeHost::new()
        .with_mounted_volume("vg0", "alpha", 10 * GB, 10 * GB)
        .with_mounted_volume("vg0", "beta", 10 * GB, 10 * GB)
        .with_mounted_volume("vg0", "gamma", 10 * GB, 10 * GB)
        .tool_exit("vg0-alpha", 30)
        .tool_exit("vg0-beta", 20);
    let result = run(&all_config(), &host);

    assert_eq!(result.status, 20);
    assert_eq!(result.processed, 3);
    assert_eq!(result.failed, 2);
}

#[test]
fn provisioning_failures_set_generic_status_per_volume() {
    let host = FakeHost::new()
        .with_mounted_volume("vg0", "alpha", 10 * GB, 10 * GB)
        .with_mounted_volume("vg0", "beta", 10 * GB, 10 * GB)
        .failing(Step::Create);
    let result = run(&all_config(), &host);

    assert_eq!(result.status, 1);
    assert_eq!(result.failed, 2);
    assert_eq!(host.count("mount"), 0);
    assert_eq!(host.count("remove"), 0);
}

#[test]
fn unlistable_group_does_not_stop_other_groups() {
    let host = FakeHost::new()
        .with_unlistable_group("vgbroken")
        .with_mounted_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&all_config(), &host);

    assert_eq!(result.status, 1);
    assert_eq!(result.processed, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(host.count("create"), 1);
    assert_eq!(host.count("remove"), 1);
}

#[test]
fn unlistable_named_group_is_a_failed_target() {
    let host = FakeHost::new()
        .with_unlistable_group("vgbroken")
        .with_mounted_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&config(&["vgbroken", "/dev/vg0/lv0"]), &host);

    assert_eq!(result.status, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(
        host.calls_to("create"),
        [format!("create /dev/vg0/lv0 {} lv0-snapshot", 10 * GB / 1024)]
    );
}

#[test]
fn group_name_expands_to_its_volumes() {
    let host = FakeHost::new()
        .with_mounted_volume("vg0", "alpha", 10 * GB, 10 * GB)
        .with_mounted_volume("vg0", "beta", 10 * GB, 10 * GB)
        .with_mounted_volume("vg1", "gamma", 10 * GB, 10 * GB);
    let result = run(&config(&["vg0"]), &host);

    assert_eq!(result.processed, 2);
    assert_eq!(
        host.calls_to("create"),
        [
            format!("create /dev/vg0/alpha {} alpha-snapshot", 10 * GB / 1024),
            format!("create /dev/vg0/beta {} beta-snapshot", 10 * GB / 1024),
        ]
    );
}

#[test]
fn duplicate_names_are_processed_twice() {
    let host = FakeHost::new().with_mounted_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let result = run(&config(&["/dev/vg0/lv0", "vg0"]), &host);

    assert_eq!(result.processed, 2);
    assert_eq!(host.count("create"), 2);
    assert_eq!(host.count("remove"), 2);
}

#[test]
fn mount_entry_is_found_through_the_mapper_alias() {
    let host = FakeHost::new()
        .with_volume("vg-data", "home-lv", 10 * GB, 10 * GB)
        .with_mount("/dev/mapper/vg--data-home--lv", "/home", "xfs", "rw,noatime");
    let result = run(&config(&["/dev/vg-data/home-lv"]), &host);

    assert_eq!(result.status, 0);
    assert_eq!(
        host.calls_to("mount"),
        ["mount /dev/vg-data/home-lv-snapshot xfs rw,noatime,ro /run/lvm-backup-test/vg-data-home-lv"]
    );
}

#[test]
fn incomplete_primary_entry_falls_back_to_the_alias() {
    let host = FakeHost::new()
        .with_volume("vg0", "lv0", 10 * GB, 10 * GB)
        .with_mount("/dev/vg0/lv0", "/srv", "ext4", "")
        .with_mount("/dev/mapper/vg0-lv0", "/srv", "ext4", "rw,discard");
    let result = run(&config(&["/dev/vg0/lv0"]), &host);

    assert_eq!(result.status, 0);
    assert_eq!(
        host.calls_to("mount"),
        ["mount /dev/vg0/lv0-snapshot ext4 rw,discard,ro /run/lvm-backup-test/vg0-lv0"]
    );
}

#[test]
fn all_with_explicit_names_is_a_usage_error() {
    let host = FakeHost::new().with_mounted_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let mut config = config(&["vg0"]);
    config.targets.all = true;

    let error = storage_backup::run(&config, collaborators(&host)).unwrap_err();
    assert!(matches!(error, ResolveError::ConflictingTargetSpecification));
    assert!(host.calls().is_empty());
}

#[test]
fn missing_targets_is_a_usage_error() {
    let host = FakeHost::new().with_mounted_volume("vg0", "lv0", 10 * GB, 10 * GB);
    let error = storage_backup::run(&config(&[]), collaborators(&host)).unwrap_err();

    assert!(matches!(error, ResolveError::NoTargetSpecified));
    assert!(host.calls().is_empty());
}
