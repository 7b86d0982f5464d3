mod utils;

use multistep::{
    debounce::Debouncer,
    error::Error,
    flow::{FlowGate, FlowOutcome, MultiStepInput},
    prompt::{InputBoxOptions, ShouldResume, Validator},
    surface::{
        scripted::{ScriptedEvent, ScriptedSurfaceProvider},
        ButtonId, SurfaceEvent,
    },
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use test_log::test;
use utils::{only, pick, PickChain};

fn steps_shown(provider: &ScriptedSurfaceProvider) -> Vec<usize> {
    provider.surfaces().iter().filter_map(|record| record.step).collect()
}

#[test(tokio::test)]
async fn back_reenters_the_previous_step_with_its_own_index() {
    let provider = ScriptedSurfaceProvider::new()
        .with_script(pick())
        .with_script(pick())
        .with_script(only(SurfaceEvent::ButtonTriggered(ButtonId::Back)))
        .with_script(pick())
        .with_script(pick());
    let chain = PickChain::new(vec!["a", "b", "c"], ShouldResume::default());
    let input = MultiStepInput::new(Arc::new(provider.clone()));

    let outcome = input.run(chain.first()).await.unwrap();
    assert_eq!(outcome, FlowOutcome::Completed);
    assert_eq!(chain.visits(), vec!["a", "b", "c", "b", "c"]);
    assert_eq!(steps_shown(&provider), vec![1, 2, 3, 2, 3]);
}

#[test(tokio::test)]
async fn back_on_the_first_step_is_a_usage_error() {
    let provider =
        ScriptedSurfaceProvider::new().with_script(only(SurfaceEvent::ButtonTriggered(ButtonId::Back)));
    let chain = PickChain::new(vec!["a", "b"], ShouldResume::default());
    let input = MultiStepInput::new(Arc::new(provider.clone()));

    let err = input.run(chain.first()).await.unwrap_err();
    assert!(matches!(err, Error::NoPreviousStep { depth: 1 }));
    assert_eq!(provider.undisposed(), 0);
}

#[test(tokio::test)]
async fn two_step_chain_runs_each_step_once_and_closes_everything() {
    let provider = ScriptedSurfaceProvider::new().with_script(pick()).with_script(pick());
    let chain = PickChain::new(vec!["a", "b"], ShouldResume::default());
    let input = MultiStepInput::new(Arc::new(provider.clone()));

    assert_eq!(input.run(chain.first()).await.unwrap(), FlowOutcome::Completed);
    assert_eq!(chain.visits(), vec!["a", "b"]);
    let surfaces = provider.surfaces();
    assert_eq!(surfaces.len(), 2);
    assert!(!surfaces[0].enabled);
    assert!(surfaces[0].busy);
    assert_eq!(provider.undisposed(), 0);
}

#[test(tokio::test)]
async fn dismissal_with_resume_reenters_the_same_step() {
    let provider = ScriptedSurfaceProvider::new()
        .with_script(pick())
        .with_script(only(SurfaceEvent::Hidden))
        .with_script(pick());
    let chain = PickChain::new(vec!["a", "b"], ShouldResume::always(true));
    let input = MultiStepInput::new(Arc::new(provider.clone()));

    assert_eq!(input.run(chain.first()).await.unwrap(), FlowOutcome::Completed);
    assert_eq!(chain.visits(), vec!["a", "b", "b"]);
    assert_eq!(steps_shown(&provider), vec![1, 2, 2]);
}

#[test(tokio::test)]
async fn dismissal_without_resume_cancels_the_flow() {
    let provider = ScriptedSurfaceProvider::new()
        .with_script(pick())
        .with_script(only(SurfaceEvent::Hidden))
        .with_script(pick());
    let chain = PickChain::new(vec!["a", "b", "c"], ShouldResume::always(false));
    let input = MultiStepInput::new(Arc::new(provider.clone()));

    assert_eq!(input.run(chain.first()).await.unwrap(), FlowOutcome::Cancelled);
    assert_eq!(chain.visits(), vec!["a", "b"]);
    assert_eq!(provider.undisposed(), 0);
}

#[test(tokio::test)]
async fn back_button_appears_only_after_the_first_step() {
    let provider =
        ScriptedSurfaceProvider::new().with_script(pick()).with_script(pick()).with_script(pick());
    let chain = PickChain::new(vec!["a", "b", "c"], ShouldResume::default());
    MultiStepInput::new(Arc::new(provider.clone())).run(chain.first()).await.unwrap();

    let backs: Vec<bool> = provider.surfaces().iter().map(|r| r.has_back_button()).collect();
    assert_eq!(backs, vec![false, true, true]);
}

#[test(tokio::test(start_paused = true))]
async fn slow_stale_validation_never_overwrites_a_fresh_result() {
    let provider = ScriptedSurfaceProvider::new().with_script(vec![
        ScriptedEvent::now(SurfaceEvent::ValueChanged("a".into())),
        ScriptedEvent::after_millis(100, SurfaceEvent::ValueChanged("ab".into())),
        // "ab" resolves at 150ms, "a" at 300ms.
        ScriptedEvent::after_millis(400, SurfaceEvent::Accepted),
    ]);
    let validate = Validator::new(|candidate: String| async move {
        match candidate.as_str() {
            "a" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Some("too short".to_string())
            }
            _ => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                None
            }
        }
    });
    let mut input = MultiStepInput::new(Arc::new(provider.clone()));
    let options = InputBoxOptions { validate, ..InputBoxOptions::default() };

    assert_eq!(input.show_input_box(options).await.unwrap(), "ab");
    let record = &provider.surfaces()[0];
    assert!(record.validation_history.iter().all(Option::is_none));
    assert_eq!(record.validation_message, None);
    assert_eq!(record.delivered, 3);
    assert!(!record.busy);
}

#[test(tokio::test(start_paused = true))]
async fn debounced_clear_fires_once_measured_from_the_second_call() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new();
    let delay = Duration::from_millis(1500);

    let counter = fired.clone();
    debouncer.schedule("clear", delay, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    tokio::time::sleep(Duration::from_millis(1000)).await;
    let counter = fired.clone();
    debouncer.schedule("clear", delay, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(1400)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test(tokio::test(start_paused = true))]
async fn cancelled_flow_leaves_no_stale_events_for_the_next_one() {
    let provider = ScriptedSurfaceProvider::new()
        .with_script(vec![
            ScriptedEvent::now(SurfaceEvent::Hidden),
            ScriptedEvent::after_millis(50, SurfaceEvent::SelectionChanged(vec![0])),
        ])
        .with_script(vec![ScriptedEvent::after_millis(100, SurfaceEvent::SelectionChanged(vec![0]))]);
    let gate = FlowGate::new();

    let first = PickChain::new(vec!["a"], ShouldResume::default());
    let input = gate.try_start(Arc::new(provider.clone())).unwrap();
    assert_eq!(input.run(first.first()).await.unwrap(), FlowOutcome::Cancelled);

    let second = PickChain::new(vec!["a"], ShouldResume::default());
    let input = gate.try_start(Arc::new(provider.clone())).unwrap();
    assert_eq!(input.run(second.first()).await.unwrap(), FlowOutcome::Completed);

    let surfaces = provider.surfaces();
    assert_eq!(surfaces[0].delivered, 1);
    assert!(surfaces[0].disposed);
    assert_eq!(surfaces[1].delivered, 1);
    assert_eq!(second.visits(), vec!["a"]);
}

#[test(tokio::test)]
async fn gate_admits_one_flow_at_a_time() {
    let provider = ScriptedSurfaceProvider::new().with_script(pick());
    let gate = FlowGate::new();
    let chain = PickChain::new(vec!["a"], ShouldResume::default());

    let input = gate.try_start(Arc::new(provider.clone())).unwrap();
    assert!(matches!(
        gate.try_start(Arc::new(provider.clone())),
        Err(Error::FlowAlreadyRunning)
    ));
    input.run(chain.first()).await.unwrap();
    assert!(!gate.is_running());
}
