use bitreel_core::codec::MAX_RUN;
use bitreel_core::{build_asset, decode_frame, encode_frame, AssetReader, Frame};
use proptest::prelude::*;

/// Pixel sequences built from runs, so long runs actually show up
fn runs_strategy(max_run: usize, max_runs: usize) -> impl Strategy<Value = Vec<bool>> {
    (any::<bool>(), prop::collection::vec(1..=max_run, 0..max_runs)).prop_map(|(first, runs)| {
        let mut pixels = Vec::new();
        let mut value = first;
        for run in runs {
            pixels.extend(std::iter::repeat(value).take(run));
            value = !value;
        }
        pixels
    })
}

proptest! {
    #[test]
    fn codec_round_trips_short_frames(pixels in prop::collection::vec(any::<bool>(), 0..512)) {
        let encoded = encode_frame(&pixels);
        prop_assert_eq!(decode_frame(&encoded, pixels.len()).unwrap(), pixels);
    }

    #[test]
    fn codec_round_trips_long_runs(pixels in runs_strategy(3 * MAX_RUN as usize, 4)) {
        let encoded = encode_frame(&pixels);
        prop_assert_eq!(decode_frame(&encoded, pixels.len()).unwrap(), pixels);
    }

    #[test]
    fn encoded_frames_keep_marker_plus_whole_fields(pixels in runs_strategy(300, 40)) {
        let encoded = encode_frame(&pixels);
        prop_assert!(!encoded.is_empty());
        prop_assert_eq!((encoded.len() - 1) % 2, 0);
    }

    #[test]
    fn random_access_matches_input(
        frames in prop::collection::vec(prop::collection::vec(any::<bool>(), 6 * 5), 0..12)
    ) {
        let blob = build_asset(&frames, 6, 5, 15).unwrap();
        let reader = AssetReader::open(blob).unwrap();
        prop_assert_eq!(reader.frame_count(), frames.len());

        for (i, pixels) in frames.iter().enumerate() {
            prop_assert_eq!(&reader.frame_at(i).unwrap().pixels, pixels);
        }

        // Every frame holds at least its marker byte
        for pair in reader.index().windows(2) {
            prop_assert!(pair[1] - pair[0] >= 1);
        }
    }
}

#[test]
fn multi_boundary_run_in_container() {
    // 200_000 pixels crosses three split points
    let width = 500;
    let height = 400;
    let mut frames = vec![
        Frame::from_fn(width, height, |_, _| true),
        Frame::blank(width, height),
        Frame::from_fn(width, height, |_, y| y >= 131),
    ];
    frames[1].pixels[199_999] = true;

    let blob = build_asset(&frames, width, height, 15).unwrap();
    let reader = AssetReader::open(&blob[..]).unwrap();
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(&reader.frame_at(i).unwrap(), frame);
    }
}
