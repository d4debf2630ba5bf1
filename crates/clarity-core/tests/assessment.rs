//! End-to-end tests of evaluation and the correction pass.
//!
//! Run with: `cargo test -p clarity-core`

use clarity_core::analysis::quality::{MAX_COLOR_CAST, MIN_CONTRAST_STD};
use clarity_core::color::luma_level;
use clarity_core::{
    Assessment, IssueKind, PixelBuffer, PixelLayout, Verdict, evaluate, evaluate_and_correct,
};

/// Dull, warm, low-contrast gradient: fails contrast, dynamic range and cast.
fn create_muddy_image(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = 100 + ((x + y) % 40) as u8;
            data.extend([v + 30, v, v - 25]);
        }
    }
    PixelBuffer::new(width, height, PixelLayout::Rgb, data).unwrap()
}

fn assert_consistent(assessment: &Assessment) {
    let expected = if assessment.issues.is_empty() {
        Verdict::Acceptable
    } else {
        Verdict::NeedsCorrection
    };
    assert_eq!(assessment.verdict, expected);

    let order = [
        IssueKind::ShadowClipping,
        IssueKind::HighlightClipping,
        IssueKind::LowDynamicRange,
        IssueKind::LowContrast,
        IssueKind::ColorCast,
    ];
    let positions: Vec<usize> = assessment
        .issues
        .iter()
        .map(|issue| order.iter().position(|&k| k == issue.kind).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn test_two_level_image_end_to_end() {
    let data = vec![10, 10, 10, 10, 10, 10, 245, 245, 245, 245, 245, 245];
    let image = PixelBuffer::new(2, 2, PixelLayout::Rgb, data).unwrap();
    let evaluation = evaluate(&image).unwrap();

    let luma = evaluation.histograms.luma();
    let dark = luma_level(10, 10, 10);
    let bright = luma_level(245, 245, 245);
    assert_eq!(luma.count(dark), 2);
    assert_eq!(luma.count(bright), 2);
    assert_eq!(luma.occupied_bins(), 2);

    let metrics = evaluation.assessment.luma;
    let expected_mean = (dark as f64 + bright as f64) / 2.0;
    assert!((metrics.mean_level - expected_mean).abs() < 1e-9);
    assert!((metrics.mean_level - 127.5).abs() <= 1.0);
    assert!((metrics.std_level - 117.5).abs() < 1e-9);
    assert_eq!(metrics.dynamic_range_bins, 2);
    assert!(evaluation.assessment.has_issue(IssueKind::LowDynamicRange));
    assert_eq!(evaluation.assessment.verdict, Verdict::NeedsCorrection);
}

#[test]
fn test_histograms_sum_to_pixel_count() {
    for layout in [PixelLayout::Gray, PixelLayout::Rgb, PixelLayout::Rgba] {
        let len = 13 * 7 * layout.channels();
        let data: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
        let image = PixelBuffer::new(13, 7, layout, data).unwrap();
        let evaluation = evaluate(&image).unwrap();
        for hist in &evaluation.histograms.bins {
            assert_eq!(hist.total(), 13 * 7, "layout {layout}");
        }
    }
}

#[test]
fn test_uniform_image_has_no_spread() {
    let image = PixelBuffer::filled(5, 5, PixelLayout::Rgb, &[128, 128, 128]).unwrap();
    let assessment = evaluate(&image).unwrap().assessment;
    assert_eq!(assessment.luma.std_level, 0.0);
    assert_eq!(assessment.luma.dynamic_range_bins, 1);
    assert!(assessment.has_issue(IssueKind::LowContrast));
    assert!(!assessment.has_issue(IssueKind::ColorCast));
}

#[test]
fn test_half_black_half_white_clips_both_ends() {
    let mut data = vec![0u8; 50];
    data.extend(vec![255u8; 50]);
    let image = PixelBuffer::new(10, 10, PixelLayout::Gray, data).unwrap();
    let assessment = evaluate(&image).unwrap().assessment;
    assert!((assessment.luma.clipping_shadows - 0.5).abs() < 1e-12);
    assert!((assessment.luma.clipping_highlights - 0.5).abs() < 1e-12);
    assert!(assessment.has_issue(IssueKind::ShadowClipping));
    assert!(assessment.has_issue(IssueKind::HighlightClipping));
}

#[test]
fn test_strong_cast_is_detected() {
    let image = PixelBuffer::filled(3, 3, PixelLayout::Rgb, &[200, 100, 100]).unwrap();
    let assessment = evaluate(&image).unwrap().assessment;
    assert!((assessment.color.color_cast_index - 400.0 / 3.0).abs() < 1e-9);
    assert!(assessment.color.color_cast_index > MAX_COLOR_CAST);
    assert!(assessment.has_issue(IssueKind::ColorCast));
}

#[test]
fn test_deficient_image_is_corrected_and_reassessed() {
    let image = create_muddy_image(48, 32);
    let outcome = evaluate_and_correct(&image).unwrap();

    let original = &outcome.original.assessment;
    assert!(original.luma.std_level < MIN_CONTRAST_STD);
    assert!(original.has_issue(IssueKind::LowContrast));
    assert!(original.has_issue(IssueKind::ColorCast));
    assert_consistent(original);

    let corrected = outcome.corrected.expect("deficient image must be corrected");
    assert_eq!(corrected.image.width(), 48);
    assert_eq!(corrected.image.height(), 32);
    assert_ne!(corrected.image, image);
    for hist in &corrected.evaluation.histograms.bins {
        assert_eq!(hist.total(), 48 * 32);
    }
    assert_consistent(&corrected.evaluation.assessment);
    assert!(corrected.evaluation.assessment.luma.std_level > original.luma.std_level);
    assert!(
        corrected.evaluation.assessment.color.color_cast_index
            < original.color.color_cast_index
    );
}

#[test]
fn test_alpha_survives_correction() {
    let mut data = Vec::new();
    for i in 0..64u32 {
        let v = 90 + (i % 20) as u8;
        data.extend([v, v, v, (i * 4) as u8]);
    }
    let image = PixelBuffer::new(8, 8, PixelLayout::Rgba, data).unwrap();
    let outcome = evaluate_and_correct(&image).unwrap();
    let corrected = outcome.corrected.expect("low contrast image must be corrected");
    for (before, after) in image
        .as_bytes()
        .chunks_exact(4)
        .zip(corrected.image.as_bytes().chunks_exact(4))
    {
        assert_eq!(before[3], after[3]);
    }
}

#[test]
fn test_assessment_serializes_to_json() {
    let image = PixelBuffer::filled(2, 2, PixelLayout::Rgb, &[200, 100, 100]).unwrap();
    let evaluation = evaluate(&image).unwrap();
    let json = serde_json::to_value(&evaluation).unwrap();
    assert_eq!(json["assessment"]["verdict"], "needs_correction");
    assert_eq!(json["assessment"]["issues"][0]["kind"], "low_dynamic_range");
    assert_eq!(json["histograms"]["bins"][0].as_array().unwrap().len(), 256);
}
