//! Integration test: drive a whole session through the wizard with a fake
//! generation service, the way the web app's update loop does.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;

use multishot_core::{
    AspectRatio, CharacterImage, CompositionDeck, Effect, EncodedImage, GeneratedImage,
    GenerationError, GenerationJob, GenerationRequest, GenerationService, ResultView, UploadDraft,
    Viewport, Wizard, WizardError, WizardEvent, WizardStep,
};

/// Returns one image per composition, or a canned error.
struct FakeService {
    fail_with: Option<GenerationError>,
    seen: RefCell<Vec<GenerationRequest>>,
}

impl FakeService {
    fn ok() -> Self {
        Self {
            fail_with: None,
            seen: RefCell::new(Vec::new()),
        }
    }

    fn failing(error: GenerationError) -> Self {
        Self {
            fail_with: Some(error),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl GenerationService for FakeService {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        let count = request.compositions.len();
        self.seen.borrow_mut().push(request);
        if let Some(ref e) = self.fail_with {
            return Err(e.clone());
        }
        Ok((0..count)
            .map(|i| GeneratedImage::new(EncodedImage::png(vec![u8::try_from(i).unwrap()])))
            .collect())
    }
}

fn run(service: &impl GenerationService, job: GenerationJob) -> WizardEvent {
    let outcome = pollster::block_on(service.generate(job.request));
    WizardEvent::GenerationFinished {
        attempt: job.attempt,
        outcome,
    }
}

/// Capture `shots` compositions from a real viewport, orbiting between
/// each, and walk the wizard up to the upload step.
fn compose(wizard: &mut Wizard, ratio: AspectRatio, shots: usize) {
    wizard
        .apply(WizardEvent::AspectRatioSelected(ratio))
        .unwrap();

    let mut viewport = Viewport::new(wizard.state().aspect_ratio);
    let mut deck = CompositionDeck::new();
    for _ in 0..shots {
        deck.capture(viewport.capture().unwrap()).unwrap();
        viewport.orbit(90.0, 10.0);
    }
    wizard
        .apply(WizardEvent::CompositionsConfirmed(deck.confirm().unwrap()))
        .unwrap();
}

fn upload(wizard: &mut Wizard) -> Effect {
    let mut draft = UploadDraft::new();
    draft
        .select("me.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
        .unwrap();
    let character = draft.submit().expect("draft has a preview");
    wizard
        .apply(WizardEvent::CharacterUploaded(character))
        .unwrap()
}

#[test]
fn full_session_produces_a_gallery() {
    let service = FakeService::ok();
    let mut wizard = Wizard::new();
    compose(&mut wizard, AspectRatio::Landscape, 3);
    assert_eq!(wizard.state().step, WizardStep::UploadImage);

    let Effect::StartGeneration(job) = upload(&mut wizard) else {
        unreachable!("upload should start generation");
    };
    assert_eq!(wizard.state().result_view(), ResultView::Loading);

    wizard.apply(run(&service, job)).unwrap();

    let seen = service.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].aspect_ratio, AspectRatio::Landscape);
    assert_eq!(seen[0].compositions.len(), 3);
    assert_eq!(seen[0].character.mime(), "image/jpeg");
    for composition in &seen[0].compositions {
        let decoded = image::load_from_memory(composition.image().bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (768, 432));
    }

    let ResultView::Gallery(images) = wizard.state().result_view() else {
        unreachable!("expected a gallery");
    };
    assert_eq!(images.len(), 3);
    assert_eq!(GeneratedImage::download_name(2), "generated-image-3.png");
}

#[test]
fn service_failure_shows_its_message_and_reset_recovers() {
    let service = FakeService::failing(GenerationError::Service("rate limited".into()));
    let mut wizard = Wizard::new();
    compose(&mut wizard, AspectRatio::Portrait, 1);

    let Effect::StartGeneration(job) = upload(&mut wizard) else {
        unreachable!("upload should start generation");
    };
    wizard.apply(run(&service, job)).unwrap();

    assert_eq!(wizard.state().step, WizardStep::ShowResults);
    assert_eq!(wizard.state().result_view(), ResultView::Failed("rate limited"));

    wizard.apply(WizardEvent::Reset).unwrap();
    assert_eq!(wizard.state().step, WizardStep::SelectAspectRatio);
    assert_eq!(wizard.state().aspect_ratio, AspectRatio::Square);
    assert!(wizard.state().error.is_none());
    assert!(wizard.state().compositions.is_empty());
}

#[test]
fn completion_after_reset_is_discarded() {
    let service = FakeService::ok();
    let mut wizard = Wizard::new();
    compose(&mut wizard, AspectRatio::Portrait, 2);

    let Effect::StartGeneration(old_job) = upload(&mut wizard) else {
        unreachable!("upload should start generation");
    };
    let old_attempt = old_job.attempt;
    wizard.apply(WizardEvent::Reset).unwrap();

    // A second session starts before the first request settles.
    compose(&mut wizard, AspectRatio::Square, 1);
    let Effect::StartGeneration(new_job) = upload(&mut wizard) else {
        unreachable!("upload should start generation");
    };
    assert_ne!(new_job.attempt, old_attempt);

    let err = wizard.apply(run(&service, old_job)).unwrap_err();
    assert_eq!(err, WizardError::StaleAttempt(old_attempt));
    assert!(wizard.state().loading);
    assert!(wizard.state().generated.is_empty());

    wizard.apply(run(&service, new_job)).unwrap();
    assert!(!wizard.state().loading);
    assert_eq!(wizard.state().generated.len(), 1);
}

#[test]
fn character_image_survives_as_uploaded() {
    let mut wizard = Wizard::new();
    compose(&mut wizard, AspectRatio::Square, 1);
    upload(&mut wizard);
    assert_eq!(
        wizard.state().character,
        Some(CharacterImage::new("image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0]))
    );
}
