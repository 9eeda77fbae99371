use demand_forecast::models::{
    load_model, ArtifactModel, LinearModel, ModelArtifact, RegressionTree, TreeEnsemble, TreeNode,
};
use demand_forecast::{DemandModel, FeatureMatrix, ForecastError, FEATURES};
use std::io::Write;
use tempfile::NamedTempFile;

fn feature_names() -> Vec<String> {
    FEATURES.iter().map(|s| s.to_string()).collect()
}

fn write_artifact(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
    FeatureMatrix::new(feature_names(), rows).unwrap()
}

#[test]
fn test_load_linear_model() {
    let file = write_artifact(
        r#"{
            "format_version": 1,
            "kind": "linear",
            "feature_names": ["lag_1", "lag_7", "lag_14", "rolling_mean_7",
                              "rolling_std_7", "dayofweek", "week", "month"],
            "intercept": 1.0,
            "coefficients": [0.5, 0.25, 0.0, 0.25, 0.0, 0.0, 0.0, 0.0]
        }"#,
    );

    let model = load_model(file.path()).unwrap();
    assert_eq!(model.name(), "linear");
    assert_eq!(model.feature_names(), feature_names());

    let predictions = model
        .predict(&matrix(vec![vec![20.0, 16.0, 0.0, 24.0, 3.0, 2.0, 5.0, 1.0]]))
        .unwrap();
    assert_eq!(predictions, vec![1.0 + 10.0 + 4.0 + 6.0]);
}

#[test]
fn test_load_tree_ensemble() {
    let ensemble = TreeEnsemble::new(
        feature_names(),
        15.0,
        vec![RegressionTree::new(vec![
            TreeNode::Split {
                feature: 5,
                threshold: 5.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: -2.0 },
            TreeNode::Leaf { value: 6.0 },
        ])],
    )
    .unwrap();
    let text = ModelArtifact::new(ArtifactModel::TreeEnsemble(ensemble))
        .to_json()
        .unwrap();
    let file = write_artifact(&text);

    let model = load_model(file.path()).unwrap();
    assert_eq!(model.name(), "tree_ensemble");

    let weekday = vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 1.0, 1.0];
    let weekend = vec![0.0, 0.0, 0.0, 0.0, 0.0, 6.0, 1.0, 1.0];
    assert_eq!(
        model.predict(&matrix(vec![weekday, weekend])).unwrap(),
        vec![13.0, 21.0]
    );
}

#[test]
fn test_missing_artifact_is_load_error() {
    let result = load_model("/nonexistent/models/demand_forecaster.json");
    match result {
        Err(ForecastError::ModelLoadError(msg)) => {
            assert!(msg.contains("/nonexistent/models/demand_forecaster.json"));
        }
        other => panic!("Expected ModelLoadError, got {:?}", other),
    }
}

#[test]
fn test_corrupt_artifact_is_load_error() {
    let file = write_artifact("\u{80}\u{5}pickle-bytes");
    assert!(matches!(
        load_model(file.path()),
        Err(ForecastError::ModelLoadError(_))
    ));
}

#[test]
fn test_inconsistent_artifact_is_load_error() {
    let file = write_artifact(
        r#"{
            "format_version": 1,
            "kind": "linear",
            "feature_names": ["lag_1", "lag_7"],
            "intercept": 0.0,
            "coefficients": [1.0]
        }"#,
    );
    assert!(matches!(
        load_model(file.path()),
        Err(ForecastError::ModelLoadError(_))
    ));
}

#[test]
fn test_model_reads_columns_by_name() {
    let model = LinearModel::new(vec!["week".to_string()], 0.0, vec![1.0]).unwrap();
    let narrow = FeatureMatrix::new(vec!["lag_1".to_string()], vec![vec![1.0]]).unwrap();

    assert!(matches!(
        model.predict(&narrow),
        Err(ForecastError::FeatureMismatchError(_))
    ));
}
