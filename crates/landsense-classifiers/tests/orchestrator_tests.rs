//! End-to-end tests for the classification orchestrator
//!
//! Exercise the model path and every route into demo mode with mock
//! backends standing in for the ONNX runtime.


use landsense_classifiers::sample::{self, SampleKind};
use landsense_classifiers::{
    validate_image, AdapterState, FallbackPredictor, LandCoverClassifier, ModelSource,
};
use landsense_core::{Error, LabelSet};
use mock_backends::{FailingBackend, FailingLoader, MockBackend, SlowLoader};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

fn forest_png() -> Vec<u8> {
    sample::render_png(SampleKind::Forest, &mut StdRng::seed_from_u64(11)).unwrap()
}

fn two_labels() -> LabelSet {
    LabelSet::new(["Forest", "River"]).unwrap()
}

fn source() -> ModelSource {
    ModelSource::from_local("./models/crop_model_web.onnx")
}

fn assert_fallback_shape(result: &landsense_core::ClassificationResult, count: usize) {
    assert!(!result.used_real_model);
    assert_eq!(result.predictions.len(), count);
    assert!((result.predictions.total() - 1.0).abs() < 1e-6);

    let top = result.top().unwrap().confidence;
    assert!((0.6..=0.9).contains(&top), "dominant confidence {}", top);
}

#[tokio::test]
async fn test_never_initialized_uses_fallback() {
    let classifier = LandCoverClassifier::new(LabelSet::eurosat());
    assert_eq!(classifier.state(), AdapterState::NotReady);

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert_fallback_shape(&result, 10);
}

#[tokio::test]
async fn test_real_model_forest_river() {
    let backend = Arc::new(MockBackend::new(vec![2.0, 0.0]));
    let classifier = LandCoverClassifier::with_backend(two_labels(), backend.clone());

    let result = classifier.classify(&forest_png()).await.unwrap();

    assert!(result.used_real_model);
    assert_eq!(backend.call_count(), 1);

    let ranked: Vec<(&str, f64)> = result
        .predictions
        .iter()
        .map(|p| (p.label.as_str(), p.confidence))
        .collect();
    assert_eq!(ranked[0].0, "Forest");
    assert!((ranked[0].1 - 0.880_797).abs() < 1e-6);
    assert_eq!(ranked[1].0, "River");
    assert!((ranked[1].1 - 0.119_203).abs() < 1e-6);
}

#[tokio::test]
async fn test_backend_failure_uses_fallback() {
    let classifier =
        LandCoverClassifier::with_backend(LabelSet::eurosat(), Arc::new(FailingBackend::new()));

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert_fallback_shape(&result, 10);

    // A failed run does not unload the model
    assert!(classifier.is_ready());
}

#[tokio::test]
async fn test_label_count_mismatch_uses_fallback() {
    let classifier = LandCoverClassifier::with_backend(
        two_labels(),
        Arc::new(MockBackend::new(vec![0.1, 0.2, 0.3])),
    );

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert_fallback_shape(&result, 2);
}

#[tokio::test]
async fn test_non_finite_scores_use_fallback() {
    let classifier = LandCoverClassifier::with_backend(
        two_labels(),
        Arc::new(MockBackend::new(vec![f32::NAN, 1.0])),
    );

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert!(!result.used_real_model);
}

#[tokio::test]
async fn test_processing_time_covers_inference() {
    let backend = MockBackend::new(vec![2.0, 0.0]).with_latency(Duration::from_millis(50));
    let classifier = LandCoverClassifier::with_backend(two_labels(), Arc::new(backend));

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert!(result.used_real_model);
    assert!(
        result.processing_time_ms >= 50,
        "processing_time_ms = {}",
        result.processing_time_ms
    );
}

#[tokio::test]
async fn test_processing_time_includes_failed_attempt() {
    let backend = FailingBackend::new()
        .with_error("graph evaluation timed out")
        .with_latency(Duration::from_millis(50));
    let classifier = LandCoverClassifier::with_backend(LabelSet::eurosat(), Arc::new(backend));

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert_fallback_shape(&result, 10);
    assert!(
        result.processing_time_ms >= 50,
        "processing_time_ms = {}",
        result.processing_time_ms
    );
}

#[tokio::test]
async fn test_decode_error_surfaces_on_both_paths() {
    let garbage = b"\x00\x01 definitely not an image";

    let demo = LandCoverClassifier::new(LabelSet::eurosat());
    assert!(matches!(demo.classify(garbage).await, Err(Error::Decode(_))));
    assert!(matches!(demo.classify(&[]).await, Err(Error::Decode(_))));

    let backend = Arc::new(MockBackend::new(vec![2.0, 0.0]));
    let real = LandCoverClassifier::with_backend(two_labels(), backend.clone());
    assert!(matches!(real.classify(garbage).await, Err(Error::Decode(_))));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_truncated_png_is_decode_error() {
    let png = forest_png();
    let truncated = &png[..png.len() / 2];

    // The header alone still looks fine
    assert_eq!(validate_image(truncated).unwrap(), (224, 224));

    let classifier = LandCoverClassifier::new(LabelSet::eurosat());
    let err = classifier.classify(truncated).await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_classify_during_slow_initialization() {
    let backend = Arc::new(MockBackend::new(vec![2.0, 0.0]));
    let loader = Arc::new(SlowLoader::new(backend, Duration::from_millis(300)));
    let classifier = Arc::new(LandCoverClassifier::new(two_labels()));

    let init = {
        let classifier = Arc::clone(&classifier);
        let loader = Arc::clone(&loader);
        tokio::spawn(async move { classifier.initialize(loader.as_ref(), &source()).await })
    };

    let png = Arc::new(forest_png());
    let requests: Vec<_> = (0..8)
        .map(|_| {
            let classifier = Arc::clone(&classifier);
            let png = Arc::clone(&png);
            tokio::spawn(async move { classifier.classify(&png).await })
        })
        .collect();

    for request in requests {
        let result = request.await.unwrap().unwrap();
        assert!(!result.used_real_model);
    }

    init.await.unwrap().unwrap();
    assert_eq!(loader.load_count(), 1);

    let result = classifier.classify(&png).await.unwrap();
    assert!(result.used_real_model);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_initialization_loads_once() {
    let loader = Arc::new(SlowLoader::new(
        Arc::new(MockBackend::new(vec![0.0, 1.0])),
        Duration::from_millis(50),
    ));
    let classifier = Arc::new(LandCoverClassifier::new(two_labels()));

    let inits: Vec<_> = (0..5)
        .map(|_| {
            let classifier = Arc::clone(&classifier);
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { classifier.initialize(loader.as_ref(), &source()).await })
        })
        .collect();

    for init in inits {
        init.await.unwrap().unwrap();
    }

    assert_eq!(loader.load_count(), 1);
    assert_eq!(
        classifier.state(),
        AdapterState::Ready {
            model: "mock".to_string()
        }
    );
}

#[tokio::test]
async fn test_failed_initialization_is_retryable() {
    let classifier = LandCoverClassifier::new(two_labels());

    let failing = FailingLoader::new();
    let err = classifier.initialize(&failing, &source()).await.unwrap_err();
    assert!(matches!(err, Error::Load(_)));
    assert!(!classifier.is_ready());

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert!(!result.used_real_model);

    let working = SlowLoader::new(Arc::new(MockBackend::new(vec![2.0, 0.0])), Duration::ZERO);
    classifier.initialize(&working, &source()).await.unwrap();
    classifier.initialize(&working, &source()).await.unwrap();
    assert_eq!(working.load_count(), 1);

    let result = classifier.classify(&forest_png()).await.unwrap();
    assert!(result.used_real_model);
}

#[tokio::test]
async fn test_background_initialization_reports_outcome() {
    let classifier = Arc::new(LandCoverClassifier::new(two_labels()));

    let loaded = landsense_classifiers::spawn_initialize(
        Arc::clone(&classifier),
        Arc::new(FailingLoader::new()),
        source(),
    )
    .await
    .unwrap();
    assert!(!loaded);

    let loader = Arc::new(SlowLoader::new(
        Arc::new(MockBackend::new(vec![1.0, 0.0])),
        Duration::ZERO,
    ));
    let loaded = landsense_classifiers::spawn_initialize(Arc::clone(&classifier), loader, source())
        .await
        .unwrap();
    assert!(loaded);
    assert!(classifier.is_ready());
}

#[tokio::test]
async fn test_seeded_fallback_is_reproducible() {
    let png = forest_png();

    let a = LandCoverClassifier::new(LabelSet::eurosat()).with_fallback(FallbackPredictor::seeded(5));
    let b = LandCoverClassifier::new(LabelSet::eurosat()).with_fallback(FallbackPredictor::seeded(5));

    for _ in 0..5 {
        let ra = a.classify(&png).await.unwrap();
        let rb = b.classify(&png).await.unwrap();
        assert_eq!(ra.predictions, rb.predictions);
    }
}

#[tokio::test]
async fn test_result_serializes_to_json() {
    let classifier = LandCoverClassifier::with_backend(
        two_labels(),
        Arc::new(MockBackend::new(vec![2.0, 0.0])),
    );
    let result = classifier.classify(&forest_png()).await.unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["used_real_model"], true);
    assert_eq!(json["predictions"][0]["label"], "Forest");
    assert!(json["processing_time_ms"].is_u64());
}
