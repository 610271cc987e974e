//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 布局 / 路由表快照测试
//! - 端到端解复用与恢复测试 (文件输入、文件输出)

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{StreamLayout, WriteDiscipline};

    #[test]
    fn test_pipeline_route_table() {
        let table = StreamLayout::pipeline().to_route_table().unwrap();
        assert_eq!(table.route_count(), 15);
        assert_eq!(table.terminal_kind(), 13);
        assert_eq!(table.checkpoint_kind(), 1);
        assert_eq!(table.get(0).unwrap().discipline, WriteDiscipline::Discard);
        assert_eq!(table.get(2).unwrap().target.as_deref(), Some("recording.tmcpr"));
        assert_eq!(table.get(14).unwrap().discipline, WriteDiscipline::Append);
        assert_eq!(table.file_routes().count(), 14);
    }

    #[test]
    fn test_legacy_route_table() {
        let table = StreamLayout::legacy().to_route_table().unwrap();
        assert_eq!(table.route_count(), 13);
        assert_eq!(table.terminal_kind(), 12);
        assert!(table.get(13).is_none());
    }

    #[test]
    fn test_preset_survives_toml_round_trip() {
        let toml = ConfigLoader::to_toml(&StreamLayout::legacy()).unwrap();
        let layout = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let table = layout.to_route_table().unwrap();
        assert_eq!(table.terminal_kind(), 12);
        assert_eq!(layout.stream.status_file, "stream_meta_data.json");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use contracts::{DemuxError, FatalKind, RouteTable, StreamLayout, WriteDiscipline};
    use demux_engine::{PassEnd, RecoveryDriver, RunOutcome, RunReport};
    use ingestion::{FileSource, SeekSource, StreamEncoder};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tempfile::TempDir;

    const SUCCESS_BODY: &str = r#"{"has_EOF":true,"miss_seq_num":false}"#;
    const GAP_BODY: &str = r#"{"has_EOF":true,"miss_seq_num":true}"#;

    /// Input file plus output directory for one scenario
    struct Scenario {
        dir: TempDir,
        layout: StreamLayout,
        table: RouteTable,
    }

    impl Scenario {
        fn new(layout: StreamLayout, stream: &[u8]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("stream.bin"), stream).unwrap();
            let table = layout.to_route_table().unwrap();
            Self { dir, layout, table }
        }

        fn out(&self) -> std::path::PathBuf {
            self.dir.path().join("out")
        }

        fn run(&self) -> Result<RunReport, DemuxError> {
            let mut source = FileSource::new(self.dir.path().join("stream.bin"));
            RecoveryDriver::new(&self.table, &self.layout.stream, self.out()).run(&mut source)
        }

        fn read(&self, target: &str) -> Vec<u8> {
            fs::read(self.out().join(target)).unwrap()
        }

        fn status(&self) -> String {
            fs::read_to_string(self.out().join(&self.layout.stream.status_file)).unwrap()
        }
    }

    fn snapshot(root: &Path) -> HashMap<String, Vec<u8>> {
        fs::read_dir(root)
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                (
                    entry.file_name().to_string_lossy().into_owned(),
                    fs::read(entry.path()).unwrap(),
                )
            })
            .collect()
    }

    /// Two records: kind 2 "abc", then the legacy terminal marker
    #[test]
    fn test_concrete_scenario() {
        let stream: Vec<u8> = [
            &[0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3][..],
            b"abc",
            &[0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0][..],
        ]
        .concat();
        let scenario = Scenario::new(StreamLayout::legacy(), &stream);

        let report = scenario.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::Success);
        assert!(report.first_pass.observed_terminal());
        assert!(!report.first_pass.gap_detected());
        assert_eq!(scenario.read("recording.tmcpr"), b"abc");
        assert_eq!(scenario.status(), SUCCESS_BODY);
    }

    #[test]
    fn test_round_trip_routing() {
        let layout = StreamLayout::pipeline();
        let table = layout.to_route_table().unwrap();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        let mut enc = StreamEncoder::new();
        let mut expected: HashMap<String, Vec<u8>> = HashMap::new();
        for _ in 0..300 {
            // every kind except the terminal marker
            let kind = loop {
                let k = rng.random_range(0..15u32);
                if k != 13 {
                    break k;
                }
            };
            let mut payload = vec![0u8; rng.random_range(0..2048)];
            rng.fill(&mut payload[..]);
            enc.push(kind, &payload);

            let route = table.get(kind).unwrap();
            match route.discipline {
                WriteDiscipline::Append => expected
                    .entry(route.target_name().to_string())
                    .or_default()
                    .extend_from_slice(&payload),
                WriteDiscipline::Overwrite => {
                    expected.insert(route.target_name().to_string(), payload);
                }
                WriteDiscipline::Discard => {}
            }
        }
        enc.push(13, b"EOF");
        expected
            .entry("end_of_stream.txt".to_string())
            .or_default()
            .extend_from_slice(b"EOF");

        let scenario = Scenario::new(layout, &enc.finish());
        let report = scenario.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(report.first_pass.records, 301);

        for (target, content) in &expected {
            assert_eq!(&scenario.read(target), content, "target {target}");
        }
        // append targets that received nothing exist and are empty
        for route in table.file_routes() {
            if route.discipline == WriteDiscipline::Append
                && !expected.contains_key(route.target_name())
            {
                assert!(scenario.read(route.target_name()).is_empty());
            }
        }
        assert_eq!(scenario.status(), SUCCESS_BODY);
    }

    #[test]
    fn test_gap_tolerance() {
        let mut enc = StreamEncoder::new();
        enc.record(2, 0, 0, b"a")
            .record(2, 1, 0, b"b")
            .record(2, 3, 0, b"c")
            .record(2, 4, 0, b"d")
            .record(12, 5, 0, b"");
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let report = scenario.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(report.first_pass.gaps, 1);
        assert_eq!(report.first_pass.records, 5);
        assert_eq!(scenario.read("recording.tmcpr"), b"abcd");
        assert_eq!(scenario.status(), GAP_BODY);
    }

    #[test]
    fn test_duplicate_sequence_tolerance() {
        let mut enc = StreamEncoder::new();
        enc.record(2, 0, 0, b"a")
            .record(2, 1, 0, b"b")
            .record(2, 1, 0, b"c")
            .record(2, 2, 0, b"d")
            .record(12, 3, 0, b"");
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let report = scenario.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(report.first_pass.regressions, 0);
        assert_eq!(report.first_pass.gaps, 1);
        assert_eq!(scenario.read("recording.tmcpr"), b"abcd");
    }

    #[test]
    fn test_regression_is_not_fatal() {
        let mut enc = StreamEncoder::new();
        enc.record(2, 0, 0, b"a")
            .record(2, 1, 0, b"b")
            .record(2, 2, 0, b"c")
            .record(2, 0, 0, b"d")
            .record(12, 1, 0, b"");
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let report = scenario.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(report.first_pass.regressions, 1);
        assert_eq!(scenario.status(), GAP_BODY);
    }

    #[test]
    fn test_terminal_enforcement() {
        let mut enc = StreamEncoder::new();
        enc.push(2, b"abc").push(12, b"").push(2, b"zzz");
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let err = scenario.run().unwrap_err();
        assert!(matches!(err, DemuxError::DataAfterTerminal { entry_kind: 2, offset: 35 }));
        assert_eq!(err.kind(), FatalKind::CorruptStream);
        assert_eq!(scenario.read("recording.tmcpr"), b"abc");
        assert!(!scenario.out().join("stream_meta_data.json").exists());
    }

    #[test]
    fn test_oversized_payload_reuses_grown_buffer() {
        let layout = StreamLayout::legacy();
        let capacity = layout.stream.staging_capacity;
        let mut rng = StdRng::seed_from_u64(42);
        let mut first = vec![0u8; capacity + 100_000];
        let mut second = vec![0u8; capacity + 100_000];
        rng.fill(&mut first[..]);
        rng.fill(&mut second[..]);

        let mut enc = StreamEncoder::new();
        enc.push(9, &first).push(9, &second).push(2, b"small").push(12, b"");
        let scenario = Scenario::new(layout, &enc.finish());

        let report = scenario.run().unwrap();
        assert_eq!(report.first_pass.staging_grows, 1);
        assert_eq!(report.first_pass.staging_capacity, capacity + 100_000);

        let asset = scenario.read("asset.zip");
        assert_eq!(asset.len(), first.len() * 2);
        assert_eq!(&asset[..first.len()], &first[..]);
        assert_eq!(&asset[first.len()..], &second[..]);
    }

    fn incomplete_stream() -> Vec<u8> {
        let mut enc = StreamEncoder::new();
        enc.push(1, b"{\"meta\":0}")
            .push(2, b"r0")
            .push(5, b"thumb-a")
            .push(1, b"{\"meta\":3}")
            .push(2, b"r4")
            .push(5, b"thumb-b")
            .push(2, b"r6-lost");
        enc.finish().to_vec()
    }

    #[test]
    fn test_recovery_stops_at_checkpoint() {
        let scenario = Scenario::new(StreamLayout::legacy(), &incomplete_stream());

        let report = scenario.run().unwrap();
        assert_eq!(report.outcome, RunOutcome::RecoveredSuccess);
        assert_eq!(report.first_pass.end, PassEnd::Incomplete);
        assert_eq!(report.first_pass.last_checkpoint_sequence, Some(3));

        let recovery = report.recovery_pass.as_ref().unwrap();
        assert_eq!(recovery.end, PassEnd::StoppedAtCheckpoint);
        assert_eq!(recovery.records, 4);

        // pass 1 output was truncated, not appended to
        assert_eq!(scenario.read("recording.tmcpr"), b"r0");
        assert_eq!(scenario.read("metaData.json"), b"{\"meta\":3}");
        assert_eq!(scenario.read("thumb.json"), b"thumb-a");
        assert!(scenario.read("asset.zip").is_empty());
        assert_eq!(scenario.status(), SUCCESS_BODY);
    }

    #[test]
    fn test_partial_header_after_terminal() {
        let mut enc = StreamEncoder::new();
        enc.push(2, b"abc").push(12, b"").raw(&[0, 0, 0, 2, 0, 0, 0, 2]);
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let err = scenario.run().unwrap_err();
        assert!(matches!(err, DemuxError::DataAfterTerminal { entry_kind: 2, offset: 35 }));
        assert_eq!(err.kind(), FatalKind::CorruptStream);
        assert_eq!(scenario.read("recording.tmcpr"), b"abc");
    }

    #[test]
    fn test_recovery_idempotence() {
        let scenario = Scenario::new(StreamLayout::legacy(), &incomplete_stream());

        scenario.run().unwrap();
        let first = snapshot(&scenario.out());
        scenario.run().unwrap();
        let second = snapshot(&scenario.out());

        assert_eq!(first, second);
        assert_eq!(first["stream_meta_data.json"], SUCCESS_BODY.as_bytes());
    }

    #[test]
    fn test_recovery_from_seekable_source() {
        let layout = StreamLayout::legacy();
        let table = layout.to_route_table().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let mut source = SeekSource::new("cursor", Cursor::new(incomplete_stream()));
        let report = RecoveryDriver::new(&table, &layout.stream, dir.path())
            .run(&mut source)
            .unwrap();
        assert_eq!(report.outcome, RunOutcome::RecoveredSuccess);
        assert_eq!(fs::read(dir.path().join("recording.tmcpr")).unwrap(), b"r0");
    }

    #[test]
    fn test_bogus_length_on_seekable_source() {
        let layout = StreamLayout::legacy();
        let table = layout.to_route_table().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let mut enc = StreamEncoder::new();
        enc.push(2, b"ok").header(2, 1, 0, 0x4000_0000).raw(b"abc");
        let mut source = SeekSource::new("cursor", Cursor::new(enc.finish().to_vec()));

        let err = RecoveryDriver::new(&table, &layout.stream, dir.path())
            .run(&mut source)
            .unwrap_err();
        assert!(matches!(
            err,
            DemuxError::TruncatedPayload {
                offset: 34,
                expected: 0x4000_0000,
                available: 3,
            }
        ));
        assert_eq!(err.kind(), FatalKind::CorruptStream);
        assert_eq!(fs::read(dir.path().join("recording.tmcpr")).unwrap(), b"ok");
    }

    #[test]
    fn test_missing_checkpoint_is_fatal() {
        let mut enc = StreamEncoder::new();
        enc.push(2, b"a").push(3, b"pack");
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let err = scenario.run().unwrap_err();
        assert!(matches!(err, DemuxError::MissingCheckpoint));
        assert_eq!(err.kind(), FatalKind::Recovery);
    }

    #[test]
    fn test_invalid_entry_kind() {
        let mut enc = StreamEncoder::new();
        enc.push(2, b"abc").push(15, b"garbage").push(13, b"");
        let scenario = Scenario::new(StreamLayout::pipeline(), &enc.finish());

        let err = scenario.run().unwrap_err();
        assert!(matches!(
            err,
            DemuxError::InvalidEntryKind {
                entry_kind: 15,
                route_count: 15,
                offset: 19,
            }
        ));
        assert_eq!(scenario.read("recording.tmcpr"), b"abc");
        assert!(!scenario.out().join("stream_meta_data.json").exists());
    }

    #[test]
    fn test_truncated_tail_is_fatal() {
        let mut enc = StreamEncoder::new();
        enc.push(1, b"{}").push(2, b"abc").raw(&[0, 0]);
        let scenario = Scenario::new(StreamLayout::legacy(), &enc.finish());

        let err = scenario.run().unwrap_err();
        assert!(matches!(
            err,
            DemuxError::TruncatedFrame {
                field: "entry_kind",
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_layout_file_drives_routing() {
        let toml = r#"
[stream]
terminal_kind = 3
checkpoint_kind = 1
staging_capacity = 8

[[routes]]
kind = 0
discipline = "discard"

[[routes]]
kind = 1
target = "meta.json"
discipline = "overwrite"

[[routes]]
kind = 2
target = "data.bin"
discipline = "append"

[[routes]]
kind = 3
target = "done.txt"
discipline = "overwrite"
"#;
        let layout =
            config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let mut enc = StreamEncoder::new();
        enc.push(1, b"m").push(2, b"0123456789").push(0, b"x").push(3, b"ok");
        let scenario = Scenario::new(layout, &enc.finish());

        let report = scenario.run().unwrap();
        assert_eq!(report.first_pass.staging_grows, 1);
        assert_eq!(scenario.read("data.bin"), b"0123456789");
        assert_eq!(scenario.read("done.txt"), b"ok");
        assert_eq!(scenario.status(), SUCCESS_BODY);
    }
}
