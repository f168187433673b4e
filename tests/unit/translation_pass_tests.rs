/*!
 * Tests for the concurrent translation pass
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subcraft::pipeline::{TranslationPass, TranslationPassConfig};
use subcraft::providers::mock::MockTranslator;
use subcraft::segmenter::SegmentText;
use subcraft::transcript::TranscriptSegment;

fn segments(count: usize) -> Vec<TranscriptSegment> {
    (0..count)
        .map(|i| TranscriptSegment::new(format!("segment {}", i), i as f64, i as f64 + 1.0))
        .collect()
}

fn no_progress(_: usize, _: usize) {}

#[tokio::test]
async fn test_run_withWorkingTranslator_shouldTranslateEverySegmentInOrder() {
    let translator = Arc::new(MockTranslator::working());
    let pass = TranslationPass::new(translator.clone(), TranslationPassConfig::new("en", "hi"));

    let (texts, stats) = pass.run(&segments(5), no_progress).await;

    assert_eq!(texts.len(), 5);
    for (i, text) in texts.iter().enumerate() {
        assert_eq!(text, &SegmentText::Translated(format!("[hi] segment {}", i)));
    }
    assert_eq!(stats.translated, 5);
    assert_eq!(stats.degraded, 0);
    assert_eq!(translator.request_count(), 5);
}

#[tokio::test]
async fn test_run_withReversedCompletionOrder_shouldJoinOnSegmentOrder() {
    let translator = Arc::new(MockTranslator::slow(5));
    let config = TranslationPassConfig::new("en", "hi").with_max_concurrent_requests(8);
    let pass = TranslationPass::new(translator, config);

    let (texts, _) = pass.run(&segments(8), no_progress).await;

    let rendered: Vec<&str> = texts.iter().map(SegmentText::text).collect();
    let expected: Vec<String> = (0..8).map(|i| format!("[hi] segment {}", i)).collect();
    assert_eq!(rendered, expected);
}

#[tokio::test]
async fn test_run_withFailingTranslator_shouldDegradeToSourceText() {
    let pass = TranslationPass::new(Arc::new(MockTranslator::failing()), TranslationPassConfig::new("en", "hi"));

    let (texts, stats) = pass.run(&segments(3), no_progress).await;

    assert_eq!(stats.degraded, 3);
    assert_eq!(stats.translated, 0);
    for (i, text) in texts.iter().enumerate() {
        assert!(text.is_degraded());
        assert_eq!(text.text(), format!("segment {}", i));
    }
}

#[tokio::test]
async fn test_run_withIntermittentFailures_shouldDegradeOnlyFailedSegments() {
    let config = TranslationPassConfig::new("en", "hi").with_max_concurrent_requests(1);
    let pass = TranslationPass::new(Arc::new(MockTranslator::intermittent(2)), config);

    let (texts, stats) = pass.run(&segments(4), no_progress).await;

    assert_eq!(stats.translated, 2);
    assert_eq!(stats.degraded, 2);
    assert!(!texts[0].is_degraded());
    assert!(texts[1].is_degraded());
    assert!(!texts[2].is_degraded());
    assert!(texts[3].is_degraded());
}

#[tokio::test]
async fn test_run_withEmptyTranslations_shouldDegrade() {
    let pass = TranslationPass::new(Arc::new(MockTranslator::empty()), TranslationPassConfig::new("en", "hi"));

    let (texts, stats) = pass.run(&segments(2), no_progress).await;

    assert_eq!(stats.degraded, 2);
    assert_eq!(texts[0], SegmentText::Degraded("segment 0".to_string()));
}

#[tokio::test]
async fn test_run_withChattyTranslator_shouldStripNumberingAndQuotes() {
    let pass = TranslationPass::new(Arc::new(MockTranslator::chatty()), TranslationPassConfig::new("en", "hi"));

    let (texts, _) = pass.run(&segments(1), no_progress).await;

    assert_eq!(texts[0], SegmentText::Translated("[hi] segment 0".to_string()));
}

#[tokio::test]
async fn test_run_withSameLanguage_shouldSkipTranslator() {
    let translator = Arc::new(MockTranslator::working());
    let pass = TranslationPass::new(translator.clone(), TranslationPassConfig::new("English", "en"));

    let (texts, stats) = pass.run(&segments(3), no_progress).await;

    assert_eq!(translator.request_count(), 0);
    assert_eq!(stats.untranslated, 3);
    assert_eq!(texts[2], SegmentText::Original("segment 2".to_string()));
}

#[tokio::test]
async fn test_run_withBlankSegment_shouldNotCallTranslatorForIt() {
    let translator = Arc::new(MockTranslator::working());
    let pass = TranslationPass::new(translator.clone(), TranslationPassConfig::new("en", "hi"));
    let input = vec![
        TranscriptSegment::new("hello", 0.0, 1.0),
        TranscriptSegment::new("   ", 1.0, 2.0),
    ];

    let (texts, stats) = pass.run(&input, no_progress).await;

    assert_eq!(translator.request_count(), 1);
    assert_eq!(stats.translated, 1);
    assert_eq!(stats.untranslated, 1);
    assert_eq!(texts[1], SegmentText::Original("   ".to_string()));
}

#[tokio::test]
async fn test_run_withProgressCallback_shouldReportEverySegment() {
    let calls = Arc::new(AtomicUsize::new(0));
    let highest = Arc::new(AtomicUsize::new(0));
    let pass = TranslationPass::new(Arc::new(MockTranslator::working()), TranslationPassConfig::new("en", "hi"));

    let callback = {
        let calls = calls.clone();
        let highest = highest.clone();
        move |current: usize, total: usize| {
            assert_eq!(total, 6);
            calls.fetch_add(1, Ordering::SeqCst);
            highest.fetch_max(current, Ordering::SeqCst);
        }
    };

    pass.run(&segments(6), callback).await;

    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert_eq!(highest.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_run_withNoSegments_shouldReturnEmpty() {
    let pass = TranslationPass::new(Arc::new(MockTranslator::failing()), TranslationPassConfig::default());

    let (texts, stats) = pass.run(&[], no_progress).await;

    assert!(texts.is_empty());
    assert_eq!(stats.degraded, 0);
}

#[test]
fn test_config_withZeroConcurrency_shouldClampToOne() {
    let config = TranslationPassConfig::default().with_max_concurrent_requests(0);
    assert_eq!(config.max_concurrent_requests, 1);
}
