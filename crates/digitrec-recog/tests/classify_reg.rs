//! Classification regression test
//!
//! Centroid and k-NN classifiers, model persistence and probability
//! fusion.
//!
//! Run with:
//! ```
//! cargo test -p digitrec-recog --test classify_reg
//! ```

use digitrec_recog::classify::{
    ClassModel, Classifier, ClassifierMode, LabeledSample, NUM_CLASSES, Probabilities, build_model,
};
use digitrec_recog::combine::{combine_product, combine_sum};
use digitrec_recog::serial::{
    read_probabilities_json, read_vectors_json, write_probabilities_json, write_vectors_json,
};
use digitrec_recog::FeatureVector;
use digitrec_test::{RegParams, regout_path};

fn sample(label: u8, v: &[f64]) -> LabeledSample {
    LabeledSample::new(label, FeatureVector::new(v.to_vec())).expect("sample")
}

fn training_set() -> Vec<LabeledSample> {
    vec![
        sample(0, &[0.10, 0.20, 0.05]),
        sample(0, &[0.12, 0.18, 0.07]),
        sample(0, &[0.08, 0.25, 0.02]),
        sample(1, &[0.40, 0.45, 0.30]),
        sample(1, &[0.42, 0.40, 0.33]),
        sample(2, &[0.90, 0.10, 0.70]),
        sample(2, &[0.85, 0.15, 0.75]),
        sample(2, &[0.95, 0.05, 0.65]),
        sample(2, &[0.88, 0.12, 0.72]),
    ]
}

#[test]
fn centroid_reg() {
    let mut rp = RegParams::new("centroid");

    let samples = training_set();
    let model = build_model(&samples, ClassifierMode::Centroid).expect("model");

    // order of same-class samples does not change the centroids
    let mut reversed = samples.clone();
    reversed.reverse();
    let model_rev = build_model(&reversed, ClassifierMode::Centroid).expect("model rev");
    let (a, b) = (model.vectors(), model_rev.vectors());
    rp.compare_values(a.len() as f64, b.len() as f64, 0.0);
    for (va, vb) in a.iter().zip(&b) {
        rp.compare_slices(va.as_slice(), vb.as_slice(), 1e-12);
    }
    rp.compare_slices(&[0.10, 0.21, 0.14 / 3.0], a[0].as_slice(), 1e-12);

    // probabilities sum to one and the nearest centroid wins
    let r = model
        .classify(&FeatureVector::new(vec![0.87, 0.11, 0.70]))
        .expect("classify");
    rp.compare_values(1.0, r.probabilities.iter().sum::<f64>(), 1e-12);
    rp.compare_values(2.0, r.label_code() as f64, 0.0);

    // an exact match far from every other centroid gets probability 1
    let far = vec![sample(3, &[0.0]), sample(7, &[100.0])];
    let model = build_model(&far, ClassifierMode::Centroid).expect("far model");
    let r = model.classify(&FeatureVector::new(vec![0.0])).expect("classify");
    rp.compare_values(1.0, r.probabilities[3], 1e-12);
    rp.compare_values(3.0, r.label_code() as f64, 0.0);

    // a query infinitely far from every centroid has no winner
    let r = model.classify(&FeatureVector::new(vec![1e9])).expect("classify");
    rp.compare_values(-1.0, r.label_code() as f64, 0.0);

    // a query of the wrong length is rejected
    rp.compare_values(
        1.0,
        model.classify(&FeatureVector::new(vec![0.0, 1.0])).is_err() as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup());
}

#[test]
fn knn_reg() {
    let mut rp = RegParams::new("knn");

    let samples = training_set();
    let pool = samples.len();

    // K = pool size gives the class prevalence whatever the query
    let model = build_model(&samples, ClassifierMode::Knn { k: pool }).expect("model");
    for query in [[0.0, 0.0, 0.0], [0.9, 0.1, 0.7], [5.0, -3.0, 2.0]] {
        let r = model.classify(&FeatureVector::new(query.to_vec())).expect("classify");
        rp.compare_values(3.0 / 9.0, r.probabilities[0], 1e-12);
        rp.compare_values(2.0 / 9.0, r.probabilities[1], 1e-12);
        rp.compare_values(4.0 / 9.0, r.probabilities[2], 1e-12);
        rp.compare_values(2.0, r.label_code() as f64, 0.0);
    }

    // K = 1 with an exact match is certain
    let model = build_model(&samples, ClassifierMode::Knn { k: 1 }).expect("model k1");
    let r = model
        .classify(&FeatureVector::new(vec![0.40, 0.45, 0.30]))
        .expect("classify");
    rp.compare_values(1.0, r.probabilities[1], 0.0);

    // K = 3 near class 0
    let model = build_model(&samples, ClassifierMode::Knn { k: 3 }).expect("model k3");
    let r = model
        .classify(&FeatureVector::new(vec![0.1, 0.2, 0.05]))
        .expect("classify");
    rp.compare_values(1.0, r.probabilities[0], 1e-12);
    rp.compare_values(0.0, r.label_code() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn persist_reg() {
    let mut rp = RegParams::new("persist");

    let model = build_model(&training_set(), ClassifierMode::Centroid).expect("model");
    let path = regout_path("persist_vectors.json");
    write_vectors_json(&path, &model.vectors()).expect("write vectors");
    let back = read_vectors_json(&path).expect("read vectors");
    rp.compare_values(NUM_CLASSES as f64, back.len() as f64, 0.0);
    for (a, b) in model.vectors().iter().zip(&back) {
        rp.compare_slices(a.as_slice(), b.as_slice(), 1e-9);
    }
    let rebuilt = ClassModel::centroids_from_vectors(back).expect("rebuild");
    rp.compare_values(1.0, (rebuilt == model) as u8 as f64, 0.0);

    // a class without training samples keeps its slot
    let sparse = build_model(&[sample(0, &[0.0]), sample(2, &[2.0])], ClassifierMode::Centroid)
        .expect("sparse model");
    let path = regout_path("persist_sparse_vectors.json");
    write_vectors_json(&path, &sparse.vectors()).expect("write sparse");
    let back = read_vectors_json(&path).expect("read sparse");
    rp.compare_values(0.0, back[1].len() as f64, 0.0);
    let rebuilt = ClassModel::centroids_from_vectors(back).expect("rebuild sparse");
    rp.compare_values(1.0, (rebuilt == sparse) as u8 as f64, 0.0);
    let query = FeatureVector::new(vec![1.0]);
    let before = sparse.classify(&query).expect("classify");
    let after = rebuilt.classify(&query).expect("classify rebuilt");
    rp.compare_values(before.label_code() as f64, after.label_code() as f64, 0.0);
    let near_two = rebuilt
        .classify(&FeatureVector::new(vec![1.8]))
        .expect("classify near 2");
    rp.compare_values(2.0, near_two.label_code() as f64, 0.0);

    let probs: Vec<Probabilities> = vec![
        std::array::from_fn(|i| i as f64 / 45.0),
        std::array::from_fn(|i| if i == 4 { 1.0 } else { 0.0 }),
    ];
    let path = regout_path("persist_probabilities.json");
    write_probabilities_json(&path, &probs).expect("write probs");
    let back = read_probabilities_json(&path).expect("read probs");
    rp.compare_values(2.0, back.len() as f64, 0.0);
    rp.compare_slices(&probs[0], &back[0], 1e-9);
    rp.compare_slices(&probs[1], &back[1], 1e-9);

    let text = std::fs::read(&path).expect("read json");
    rp.write_data_and_check(&text, "json").expect("check json");

    assert!(rp.cleanup());
}

#[test]
fn combine_reg() {
    let mut rp = RegParams::new("combine");

    let mut a: Probabilities = [0.0; NUM_CLASSES];
    let mut b: Probabilities = [0.0; NUM_CLASSES];
    a[0] = 0.2;
    a[1] = 0.8;
    b[0] = 0.8;
    b[1] = 0.2;

    let sum = combine_sum(&[a], &[b]).expect("sum");
    for i in 0..NUM_CLASSES {
        rp.compare_values((a[i] + b[i]) / 2.0, sum[0][i], 1e-12);
    }

    let product = combine_product(&[a], &[b]).expect("product");
    rp.compare_values(0.5, product[0][0], 1e-12);
    rp.compare_values(0.5, product[0][1], 1e-12);

    rp.compare_values(1.0, combine_sum(&[a, b], &[a]).is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup());
}
