// Day/camera grouping
//
// Segments are bucketed into per-day batches, one camera channel at a time.
// The sort key is the fixed-width `datetime_key` string; lexicographic order
// on it is chronological order.

use std::collections::BTreeMap;

use crate::recording::{CameraChannel, RecordingFilename};

/// A camera-homogeneous, date-homogeneous ordered group of segments.
/// Members are ordered by `datetime_key` ascending and the sequence is
/// non-empty by construction.
#[derive(Debug, Clone)]
pub struct DayBatch {
    pub date: String,
    pub camera: CameraChannel,
    pub members: Vec<RecordingFilename>,
}

/// Partition `segments` of the given channel into per-day batches, keyed by
/// date. Input order only matters as the tie-break for equal datetime keys
/// (stable sort). Segments of other channels are ignored; empty input yields
/// an empty map.
///
/// Iteration order of the returned map is ascending date, which on the sorted
/// sequence equals the order each date is first seen.
pub fn group_by_day(
    segments: &[RecordingFilename],
    channel: CameraChannel,
) -> BTreeMap<String, DayBatch> {
    let mut sorted: Vec<&RecordingFilename> = segments
        .iter()
        .filter(|s| s.camera == channel)
        .collect();
    sorted.sort_by(|a, b| a.datetime_key.cmp(&b.datetime_key));

    let mut batches: BTreeMap<String, DayBatch> = BTreeMap::new();
    for segment in sorted {
        batches
            .entry(segment.date.clone())
            .or_insert_with(|| DayBatch {
                date: segment.date.clone(),
                camera: channel,
                members: Vec::new(),
            })
            .members
            .push(segment.clone());
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn rec(name: &str) -> RecordingFilename {
        RecordingFilename::parse(Path::new(name)).unwrap()
    }

    #[test]
    fn test_groups_are_chronological_not_discovery_ordered() {
        // Later datetime first in discovery order
        let segments = vec![
            rec("20221002_195343_0.ts"),
            rec("20221002_184909_0.ts"),
            rec("20221002_190128_0.ts"),
        ];

        let batches = group_by_day(&segments, CameraChannel::Front);
        assert_eq!(batches.len(), 1);
        let batch = &batches["20221002"];
        let keys: Vec<&str> = batch.members.iter().map(|m| m.datetime_key.as_str()).collect();
        assert_eq!(keys, vec!["20221002_184909", "20221002_190128", "20221002_195343"]);
    }

    #[test]
    fn test_channels_are_grouped_independently() {
        let segments = vec![
            rec("20221002_184909_0.ts"),
            rec("20221002_184909_1.ts"),
            rec("20221003_120000_1.ts"),
            rec("20221002_200000_2.ts"), // unknown token, in neither pass
        ];

        let front = group_by_day(&segments, CameraChannel::Front);
        assert_eq!(front.len(), 1);
        assert_eq!(front["20221002"].members.len(), 1);

        let rear = group_by_day(&segments, CameraChannel::Rear);
        assert_eq!(rear.len(), 2);
        assert_eq!(rear["20221002"].members.len(), 1);
        assert_eq!(rear["20221003"].members.len(), 1);
        assert!(rear.values().all(|b| b.camera == CameraChannel::Rear));
    }

    #[test]
    fn test_grouping_is_idempotent_and_permutation_stable() {
        let forward = vec![
            rec("20221002_184909_0.ts"),
            rec("20221002_190128_0.ts"),
            rec("20221003_080000_0.ts"),
        ];
        let mut permuted = forward.clone();
        permuted.reverse();

        let a = group_by_day(&forward, CameraChannel::Front);
        let b = group_by_day(&forward, CameraChannel::Front);
        let c = group_by_day(&permuted, CameraChannel::Front);

        for (x, y) in [(&a, &b), (&a, &c)] {
            assert_eq!(x.len(), y.len());
            for (date, batch) in x {
                let other = &y[date];
                let xs: Vec<&str> = batch.members.iter().map(|m| m.datetime_key.as_str()).collect();
                let ys: Vec<&str> = other.members.iter().map(|m| m.datetime_key.as_str()).collect();
                assert_eq!(xs, ys, "membership and order must match for {}", date);
            }
        }
    }

    #[test]
    fn test_equal_keys_keep_discovery_order() {
        let first = RecordingFilename::parse(Path::new("a/20221002_184909_0.ts")).unwrap();
        let second = RecordingFilename::parse(Path::new("b/20221002_184909_0.ts")).unwrap();
        let batches = group_by_day(&[first, second], CameraChannel::Front);
        let members = &batches["20221002"].members;
        assert_eq!(members[0].origin_path, Path::new("a/20221002_184909_0.ts"));
        assert_eq!(members[1].origin_path, Path::new("b/20221002_184909_0.ts"));
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let batches = group_by_day(&[], CameraChannel::Front);
        assert!(batches.is_empty());
    }
}
