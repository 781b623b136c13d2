//! End-to-end pipeline regression test
//!
//! Renders synthetic training and test sheets, runs the configured
//! pipeline over them and checks recognition counts and artifacts.
//!
//! Run with:
//! ```
//! cargo test -p digitrec-recog --test pipeline_reg
//! ```

use digitrec_core::Pix;
use digitrec_io::{ImageFormat, write_image};
use digitrec_recog::classify::{ClassifierMode, NUM_CLASSES};
use digitrec_recog::pipeline::OutputPaths;
use digitrec_recog::serial::{read_labels_json, read_probabilities_json, read_vectors_json};
use digitrec_recog::ClassModel;
use digitrec_recog::{FeatureStrategy, PipelineConfig, run_pipeline};
use digitrec_test::{RegParams, regout_path, synth};
use std::path::PathBuf;

/// Write a training sheet (4 per class) and a test sheet (2 per class)
fn write_sheets(prefix: &str) -> (PathBuf, PathBuf) {
    let train = synth::digit_sheet(
        &synth::SheetSpec::default()
            .with_samples_per_class(4)
            .without_jitter(),
    )
    .expect("training sheet");
    let test = synth::digit_sheet(
        &synth::SheetSpec::default()
            .with_samples_per_class(2)
            .without_jitter(),
    )
    .expect("test sheet");
    let train_path = PathBuf::from(regout_path(&format!("{}_train.png", prefix)));
    let test_path = PathBuf::from(regout_path(&format!("{}_test.tif", prefix)));
    write_image(&train, &train_path, ImageFormat::Png).expect("write training");
    write_image(&test, &test_path, ImageFormat::Tiff).expect("write test");
    (train_path, test_path)
}

#[test]
fn pipeline_fusion_reg() {
    let mut rp = RegParams::new("pipeline_fusion");
    let (train, test) = write_sheets("pipeline_fusion");

    let output = OutputPaths {
        vectors_json: Some(regout_path("pipeline_fusion_vectors.json").into()),
        pool_labels_json: None,
        probabilities_json: Some(regout_path("pipeline_fusion_zoning.json").into()),
        fusion_probabilities_json: Some(regout_path("pipeline_fusion_profile.json").into()),
        sum_json: Some(regout_path("pipeline_fusion_sum.json").into()),
        product_json: Some(regout_path("pipeline_fusion_product.json").into()),
        recognition_csv: Some(regout_path("pipeline_fusion_table.csv").into()),
        annotated_training: Some(regout_path("pipeline_fusion_train_boxes.png").into()),
        annotated_test: None,
    };
    let config = PipelineConfig::new(&train, &test)
        .with_samples_per_class(4, 2)
        .with_strategy(FeatureStrategy::zoning())
        .with_fusion(FeatureStrategy::Profile { rows: 20 })
        .with_output(output.clone());

    let report = run_pipeline(&config).expect("pipeline");
    rp.compare_values(40.0, report.training_boxes.len() as f64, 0.0);
    rp.compare_values(20.0, report.test_boxes.len() as f64, 0.0);

    // identical glyphs per class: zoning recognizes every test digit
    rp.compare_values(20.0, report.primary.stats.recognized() as f64, 0.0);
    rp.compare_values(1.0, report.primary.stats.rate(), 0.0);

    // profile margins cannot tell 0, 1 and 8 apart; ties go to 0
    let profile = report.fusion.as_ref().expect("fusion report");
    rp.compare_values(16.0, profile.stats.recognized() as f64, 0.0);
    rp.compare_values(0.0, profile.stats.class_rate(1), 0.0);
    rp.compare_values(0.0, profile.stats.class_rate(8), 0.0);
    rp.compare_values(1.0, profile.stats.class_rate(0), 0.0);

    // table: rows = class, columns = zoning, profile, sum, product
    rp.compare_values(10.0, report.table.rows.len() as f64, 0.0);
    rp.compare_strings(
        b"zoning,profile,sum,product",
        report.table.methods.join(",").as_bytes(),
    );
    for (class, row) in report.table.rows.iter().enumerate() {
        rp.compare_values(100.0, row[0], 0.0);
        let expected_profile = if class == 1 || class == 8 { 0.0 } else { 100.0 };
        rp.compare_values(expected_profile, row[1], 0.0);
        let in_range = row.iter().all(|v| (0.0..=100.0).contains(v));
        rp.compare_values(1.0, in_range as u8 as f64, 0.0);
    }

    // artifacts
    let vectors = read_vectors_json(output.vectors_json.as_ref().expect("path")).expect("vectors");
    rp.compare_values(NUM_CLASSES as f64, vectors.len() as f64, 0.0);
    rp.compare_values(64.0, vectors[0].len() as f64, 0.0);
    let sum = read_probabilities_json(output.sum_json.as_ref().expect("path")).expect("sum");
    rp.compare_values(20.0, sum.len() as f64, 0.0);
    rp.compare_values(1.0, sum[0].iter().sum::<f64>(), 1e-9);
    let csv = std::fs::read_to_string(output.recognition_csv.as_ref().expect("path")).expect("csv");
    rp.compare_values(10.0, csv.lines().count() as f64, 0.0);
    rp.compare_values(4.0, csv.lines().next().unwrap_or("").split(',').count() as f64, 0.0);
    rp.write_data_and_check(csv.as_bytes(), "csv").expect("check csv");

    assert!(rp.cleanup());
}

#[test]
fn pipeline_knn_reg() {
    let mut rp = RegParams::new("pipeline_knn");
    let (train, test) = write_sheets("pipeline_knn");

    // explicit labels equal to the positional ones
    let training_labels: Vec<u8> = (0..40).map(|i| (i / 4) as u8).collect();
    let mut config = PipelineConfig::new(&train, &test)
        .with_strategy(FeatureStrategy::zoning())
        .with_mode(ClassifierMode::Knn { k: 4 });
    config.training_labels = Some(training_labels);
    config.test_samples_per_class = 2;

    let report = run_pipeline(&config).expect("pipeline");
    rp.compare_values(20.0, report.primary.stats.recognized() as f64, 0.0);
    rp.compare_values(1.0, report.fusion.is_none() as u8 as f64, 0.0);
    rp.compare_values(1.0, report.table.methods.len() as f64, 0.0);

    // every winning vote is unanimous
    let unanimous = report
        .primary
        .results
        .iter()
        .flatten()
        .all(|r| r.label.is_some_and(|l| r.probabilities[l as usize] == 1.0));
    rp.compare_values(1.0, unanimous as u8 as f64, 0.0);

    // wrong label count is rejected
    let mut bad = config.clone();
    bad.training_labels = Some(vec![0; 39]);
    rp.compare_values(1.0, run_pipeline(&bad).is_err() as u8 as f64, 0.0);

    // the pool persists with its labels and rebuilds the same model
    let mut persisted = config.clone();
    persisted.output.vectors_json = Some(regout_path("pipeline_knn_pool.json").into());
    persisted.output.pool_labels_json = Some(regout_path("pipeline_knn_labels.json").into());
    let report = run_pipeline(&persisted).expect("pipeline");
    let vectors = read_vectors_json(regout_path("pipeline_knn_pool.json")).expect("pool");
    let labels = read_labels_json(regout_path("pipeline_knn_labels.json")).expect("labels");
    rp.compare_values(40.0, vectors.len() as f64, 0.0);
    rp.compare_values(40.0, labels.len() as f64, 0.0);
    let rebuilt = ClassModel::pool_from_vectors(vectors, &labels, 4).expect("rebuild");
    rp.compare_values(1.0, (rebuilt == report.primary.model) as u8 as f64, 0.0);

    // config round-trips through JSON
    let path = regout_path("pipeline_knn_config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).expect("json")).expect("write");
    let loaded = PipelineConfig::from_json_file(&path).expect("load");
    rp.compare_values(1.0, (loaded == config) as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

/// Test page with an "=" glyph (no ink on its middle rows) followed by a
/// solid block
fn gapped_test_sheet() -> Pix {
    let mut pm = synth::blank_page(40, 26).expect("page").to_mut();
    let mut paint = |x0: u32, y0: u32, w: u32, h: u32| {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                pm.set_pixel(x, y, synth::INK).expect("paint");
            }
        }
    };
    paint(5, 5, 10, 3);
    paint(5, 18, 10, 3);
    paint(20, 5, 10, 16);
    pm.into()
}

#[test]
fn pipeline_excluded_reg() {
    let mut rp = RegParams::new("pipeline_excluded");
    let (train, _) = write_sheets("pipeline_excluded");
    let test = PathBuf::from(regout_path("pipeline_excluded_gapped.png"));
    write_image(&gapped_test_sheet(), &test, ImageFormat::Png).expect("write test");

    let output = OutputPaths {
        probabilities_json: Some(regout_path("pipeline_excluded_profile.json").into()),
        fusion_probabilities_json: Some(regout_path("pipeline_excluded_zoning.json").into()),
        sum_json: Some(regout_path("pipeline_excluded_sum.json").into()),
        product_json: Some(regout_path("pipeline_excluded_product.json").into()),
        ..OutputPaths::default()
    };
    let config = PipelineConfig::new(&train, &test)
        .with_samples_per_class(4, 1)
        .with_strategy(FeatureStrategy::Profile { rows: 6 })
        .with_fusion(FeatureStrategy::zoning())
        .with_output(output.clone());

    let report = run_pipeline(&config).expect("pipeline");
    rp.compare_values(2.0, report.test_boxes.len() as f64, 0.0);
    // sampled row 5 of the "=" glyph has no ink
    rp.compare_values(1.0, report.primary.results[0].is_none() as u8 as f64, 0.0);
    rp.compare_values(1.0, report.primary.results[1].is_some() as u8 as f64, 0.0);
    rp.compare_values(1.0, report.primary.stats.samples() as f64, 0.0);

    // every probability file keeps one row per test box
    for path in [
        &output.probabilities_json,
        &output.fusion_probabilities_json,
        &output.sum_json,
        &output.product_json,
    ] {
        let rows = read_probabilities_json(path.as_ref().expect("path")).expect("read");
        rp.compare_values(2.0, rows.len() as f64, 0.0);
    }
    let profile = read_probabilities_json(output.probabilities_json.as_ref().expect("path"))
        .expect("profile");
    rp.compare_values(0.0, profile[0].iter().sum::<f64>(), 0.0);
    rp.compare_values(1.0, profile[1].iter().sum::<f64>(), 1e-9);
    let zoning = read_probabilities_json(output.fusion_probabilities_json.as_ref().expect("path"))
        .expect("zoning");
    rp.compare_values(1.0, zoning[0].iter().sum::<f64>(), 1e-9);
    let sum = read_probabilities_json(output.sum_json.as_ref().expect("path")).expect("sum");
    rp.compare_values(0.0, sum[0].iter().sum::<f64>(), 0.0);
    rp.compare_values(1.0, sum[1].iter().sum::<f64>(), 1e-9);

    assert!(rp.cleanup());
}
