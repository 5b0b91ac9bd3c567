use kptrack::{
    retain_best, retain_in_roi, suppress, suppress_frames, Candidate, NmsConfig, RingBuffer, Roi,
};

/// Per-frame record as a pipeline driver would keep it.
#[derive(Debug)]
struct FrameRecord {
    index: usize,
    raw_count: usize,
    keypoints: Vec<Candidate>,
}

/// Synthetic detector response: a bright blob that drifts to the right.
fn detector_response(frame: usize) -> Vec<Candidate> {
    let cx = 20.0 + 4.0 * frame as f32;
    let cy = 30.0;
    let mut raw = Vec::new();
    for row in 0..60 {
        for col in 0..80 {
            let (x, y) = (col as f32, row as f32);
            let dist = (x - cx).abs() + (y - cy).abs();
            let score = 255.0 - 12.0 * dist;
            if score > 0.0 {
                raw.push(Candidate::new(x, y, 6.0, score));
            }
        }
    }
    raw
}

#[test]
fn history_holds_the_latest_deduplicated_frames() {
    let capacity = 2;
    let mut history = RingBuffer::new(capacity).unwrap();
    let roi = Roi::new(10, 15, 50, 30).unwrap();
    let cfg = NmsConfig {
        min_score: Some(100.0),
        ..NmsConfig::default()
    };

    for index in 0..6 {
        let mut raw = detector_response(index);
        let raw_count = raw.len();
        retain_in_roi(&mut raw, &roi);
        let kept = suppress(&raw, &cfg).unwrap();
        assert!(kept.len() < raw.len());
        assert!(kept.iter().all(|c| roi.contains(c)));

        history.push_back(FrameRecord {
            index,
            raw_count,
            keypoints: Vec::new(),
        });
        history.back_mut().unwrap().keypoints = retain_best(&kept, 5);

        assert!(history.len() <= capacity);
        if let Some((prev, curr)) = history.latest_pair() {
            assert_eq!(prev.index + 1, curr.index);
        }
    }

    let indices: Vec<usize> = history.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![4, 5]);

    let newest = history.back().unwrap();
    assert!(newest.raw_count > newest.keypoints.len());
    assert!(newest.keypoints.len() <= 5);
    assert_eq!(newest.keypoints[0].score, 255.0);
    assert_eq!(newest.keypoints[0].x, 40.0);
    assert!(newest
        .keypoints
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}

#[test]
fn batch_suppression_matches_per_frame_calls() {
    let frames: Vec<Vec<Candidate>> = (0..4).map(detector_response).collect();
    let cfg = NmsConfig {
        max_overlap: 0.1,
        ..NmsConfig::default()
    };

    let batch = suppress_frames(&frames, &cfg).unwrap();
    assert_eq!(batch.len(), frames.len());
    for (raw, kept) in frames.iter().zip(batch.iter()) {
        assert_eq!(kept, &suppress(raw, &cfg).unwrap());
    }
}

#[test]
fn batch_rejects_invalid_threshold_before_work() {
    let cfg = NmsConfig {
        max_overlap: 1.5,
        ..NmsConfig::default()
    };
    assert!(suppress_frames(&[], &cfg).is_err());
}
