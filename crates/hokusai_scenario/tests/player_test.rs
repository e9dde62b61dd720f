//! Integration tests for the scenario player.

mod test_utils;

use hokusai_core::{ParamStore, Row, Value};
use hokusai_error::RowContext;
use hokusai_interface::{EndReason, ResourceOwner, SavePoint, Tween};
use hokusai_scenario::{
    Command, CommandSettings, ExecutionContext, PlayerConfig, PlayerState, ReadHistory,
    SuspendReason, TickStatus,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_utils::{LoaderCall, player, run_to_halt, table};

#[test]
fn test_false_branch_is_skipped_but_still_paginates() {
    let mut params = ParamStore::new();
    params.set("x", 5);
    let mut player = player(vec![table(
        "branch",
        "*branch\nIf,x>0\nText,,,,,,,pos\nElse\nText,,,,,,,nonpos\nEndIf\n",
    )])
    .with_params(params);

    player.start("branch", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["pos"]);
    assert_eq!(player.host().pages_begun, vec![("branch".to_string(), 0)]);
    // The skipped "nonpos" line still occupies a page.
    assert_eq!(player.current_page(), 1);
    assert_eq!(player.state(), &PlayerState::EndedNormally);
}

#[test]
fn test_else_if_after_taken_branch_is_skipped() {
    let mut params = ParamStore::new();
    params.set("x", 5);
    let mut player = player(vec![table(
        "chain",
        "*chain\nIf,x>0\nText,,,,,,,first\nElseIf,x>1\nText,,,,,,,second\nElse\nText,,,,,,,third\nEndIf\nText,,,,,,,done\n",
    )])
    .with_params(params);

    player.start("chain", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["first", "done"]);
}

#[test]
fn test_nested_if_inside_false_branch_stays_suppressed() {
    let mut params = ParamStore::new();
    params.set("x", 5);
    let mut player = player(vec![table(
        "nest",
        "*nest\nIf,x<0\nText,,,,,,,outer\nIf,x>0\nText,,,,,,,inner\nEndIf\nElse\nText,,,,,,,otherwise\nEndIf\nText,,,,,,,after\n",
    )])
    .with_params(params);

    player.start("nest", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["otherwise", "after"]);
    assert_eq!(player.state(), &PlayerState::EndedNormally);
}

#[test]
fn test_stray_end_if_is_ignored_at_run_time() {
    let mut player = player(vec![table(
        "stray",
        "*stray\nEndIf\nText,,,,,,,still here\n",
    )]);

    player.start("stray", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["still here"]);
    assert_eq!(player.state(), &PlayerState::EndedNormally);
}

#[test]
fn test_start_at_page_resumes_after_that_boundary() {
    let mut player = player(vec![table(
        "story",
        "*intro,Intro\nText,,,,,,,one\nText,,,,,,,two\nText,,,,,,,three\n",
    )]);

    player.start("*intro", 2, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["three"]);
    assert_eq!(player.host().pages_begun, vec![("intro".to_string(), 2)]);
}

#[test]
fn test_resume_from_save_point() {
    let mut player = player(vec![table(
        "story",
        "*intro\nText,,,,,,,one\nText,,,,,,,two\nText,,,,,,,three\n",
    )]);
    player.host_mut().text_done = false;

    player.start("intro", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    let point = player.save_point();
    assert_eq!(point, SavePoint::new("intro", 0));

    player.stop();
    player.host_mut().texts.clear();
    player.host_mut().text_done = true;
    player.resume(&SavePoint::new("intro", 1));
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["two", "three"]);
}

#[test]
fn test_page_past_the_end_starts_at_label() {
    let mut player = player(vec![table("story", "*intro\nText,,,,,,,one\n")]);

    player.start("intro", 9, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["one"]);
    assert_eq!(player.current_page(), 0);
}

#[test]
fn test_jump_aborts_run_and_releases_preload_first() {
    let mut player = player(vec![
        table(
            "main",
            "*main\nBg,room\nJump,*other\nBg,hall\nText,,,,,,,never\n",
        ),
        table("side", "*other\nBg,forest\n"),
    ]);

    player.start("main", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::LabelLoad));
    assert_eq!(player.resources().count_owned_by(ResourceOwner::Preload), 0);
    run_to_halt(&mut player);

    let host = player.host();
    assert!(host.saw("bg Texture/BG/room.jpg"));
    assert!(host.saw("bg Texture/BG/forest.jpg"));
    assert!(!host.saw("hall"));
    assert!(host.texts.is_empty());
    assert_eq!(player.current_label(), "other");

    let loader = player.resources().loader();
    let unload_hall = loader
        .position(&LoaderCall::Unload("Texture/BG/hall.jpg".to_string()))
        .expect("hall was preloaded and released");
    let load_forest = loader
        .position(&LoaderCall::Load("Texture/BG/forest.jpg".to_string()))
        .expect("forest was loaded");
    assert!(unload_hall < load_forest);
}

#[test]
fn test_stop_and_erase_only_act_on_live_runs() {
    let mut player = player(vec![table("story", "*intro\nText,,,,,,,one\n")]);
    player.stop();
    player.erase();
    assert_eq!(player.state(), &PlayerState::Idle);
    assert!(player.host().ended.is_empty());

    player.host_mut().text_done = false;
    player.start("intro", 0, None);
    player.tick();
    player.stop();
    player.stop();
    player.erase();

    assert_eq!(player.state(), &PlayerState::Stopped);
    assert_eq!(player.host().ended, vec![EndReason::Stopped]);
    assert_eq!(player.tick(), TickStatus::Halted);
}

#[test]
fn test_erase_while_loading_label() {
    let mut player = player(vec![]);
    player
        .source_mut()
        .add_pending_table(table("late", "*late\nText,,,,,,,hello\n"));

    player.start("late", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::LabelLoad));
    assert!(player.is_waiting_on_load());
    player.erase();

    assert_eq!(player.state(), &PlayerState::Erased);
    assert_eq!(player.host().ended, vec![EndReason::Erased]);
}

#[test]
fn test_restarting_mid_run_leaves_no_resources_held() {
    let mut player = player(vec![table(
        "story",
        "*intro\nBg,room\nSe,door\nText,,,,,,,one\nBg,hall\n",
    )]);
    player.host_mut().text_done = false;

    player.start("intro", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    assert!(player.resources().held().count() > 0);

    player.start("intro", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    player.stop();

    assert_eq!(player.resources().held().count(), 0);
    let loader = player.resources().loader();
    assert_eq!(loader.load_count(), loader.unload_count());
}

#[test]
fn test_preload_window_respects_cap() {
    let config = PlayerConfig::builder()
        .preload_cap(2usize)
        .build()
        .expect("valid config");
    let mut player = player(vec![table(
        "gallery",
        "*gallery\nBg,a\nWait,,,,,,1\nBg,b\nWait,,,,,,1\nBg,c\nWait,,,,,,1\nBg,d\nWait,,,,,,1\nBg,e\nWait,,,,,,1\n",
    )])
    .with_config(&config);

    player.start("gallery", 0, None);
    let mut suspensions = 0;
    while player.tick() != TickStatus::Halted {
        let preloaded = player.resources().count_owned_by(ResourceOwner::Preload);
        assert!(preloaded <= 2, "preloaded {}", preloaded);
        if suspensions == 0 {
            assert_eq!(preloaded, 2);
        }
        suspensions += 1;
        player.host_mut().advance(Duration::from_secs(1));
    }

    assert_eq!(suspensions, 5);
    assert_eq!(player.resources().held().count(), 0);
}

#[test]
fn test_waits_for_pending_label_table() {
    let mut player = player(vec![]);
    player
        .source_mut()
        .add_pending_table(table("late", "*late\nText,,,,,,,hello\n"));

    player.start("late", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::LabelLoad));
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::LabelLoad));
    assert_eq!(player.source().requested(), ["late".to_string()]);

    player.source_mut().set_ready("late", true);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["hello"]);
}

#[test]
fn test_waits_for_resources_and_skips_failed_ones() {
    let mut player = player(vec![table("story", "*intro\nBg,room\nText,,,,,,,after\n")]);
    let room = "Texture/BG/room.jpg".to_string();
    player.resources_mut().loader_mut().pending.insert(room.clone());

    player.start("intro", 0, None);
    assert_eq!(
        player.tick(),
        TickStatus::Suspended(SuspendReason::ResourceLoad)
    );
    assert!(player.is_waiting_on_load());
    assert_eq!(
        player.tick(),
        TickStatus::Suspended(SuspendReason::ResourceLoad)
    );

    let loader = player.resources_mut().loader_mut();
    loader.pending.remove(&room);
    loader.failing.insert(room);
    run_to_halt(&mut player);

    assert!(!player.host().saw("bg"));
    assert_eq!(player.host().texts, vec!["after"]);
}

#[test]
fn test_timed_wait_follows_host_clock() {
    let mut player = player(vec![table(
        "story",
        "*intro\nWait,,,,,,0.5\nText,,,,,,,after\n",
    )]);

    player.start("intro", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    player.host_mut().advance(Duration::from_millis(200));
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    assert!(player.host().texts.is_empty());

    player.host_mut().advance(Duration::from_millis(300));
    run_to_halt(&mut player);
    assert_eq!(player.host().texts, vec!["after"]);
}

#[test]
fn test_fade_waits_for_host() {
    let mut player = player(vec![table("story", "*intro\nFadeOut,,,,,,1\nText,,,,,,,dark\n")]);
    player.host_mut().fade_done = false;

    player.start("intro", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    assert!(player.host().saw("fade Out 1"));

    player.host_mut().fade_done = true;
    run_to_halt(&mut player);
    assert_eq!(player.host().texts, vec!["dark"]);
}

#[test]
fn test_selection_applies_effect_and_jumps() {
    let mut player = player(vec![table(
        "choice",
        "*choice\nSelection,*left,flag=1,,,,,Go left\nSelection,*right,,,,,,Go right\n\
         *left\nText,,,,,,,left side\nEndScenario\n*right\nText,,,,,,,right side\n",
    )]);

    player.start("choice", 0, None);
    assert_eq!(player.tick(), TickStatus::Suspended(SuspendReason::CommandWait));
    assert_eq!(
        player.host().presented,
        vec![vec!["Go left".to_string(), "Go right".to_string()]]
    );

    player.host_mut().selection = Some(0);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["left side"]);
    assert_eq!(player.params().get("flag"), Some(&Value::Int(1)));
    assert_eq!(player.host().ended, vec![EndReason::Completed]);
    assert_eq!(player.current_label(), "left");
}

#[test]
fn test_conditional_jump() {
    let mut player = player(vec![table(
        "story",
        "*intro\nParam,seen=1\nJump,*skip,seen==0\nText,,,,,,,stay\nJump,*skip\nText,,,,,,,never\n*skip\nText,,,,,,,skipped\n",
    )]);

    player.start("intro", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.host().texts, vec!["stay", "skipped"]);
}

#[test]
fn test_control_commands_end_the_run() {
    let mut player = player(vec![table(
        "story",
        "*stop\nStopScenario\nText,,,,,,,never\n*erase\nEraseScenario\n",
    )]);

    player.start("stop", 0, None);
    run_to_halt(&mut player);
    assert_eq!(player.state(), &PlayerState::Stopped);

    player.start("erase", 0, None);
    run_to_halt(&mut player);
    assert_eq!(player.state(), &PlayerState::Erased);
    assert_eq!(
        player.host().ended,
        vec![EndReason::Stopped, EndReason::Erased]
    );
    assert!(player.host().texts.is_empty());
}

#[test]
fn test_undefined_label_ends_normally() {
    let mut player = player(vec![table("story", "*intro\nText,,,,,,,one\n")]);

    player.start("nowhere", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.state(), &PlayerState::EndedNormally);
    assert!(player.host().texts.is_empty());
}

#[test]
fn test_read_history_and_autosave() {
    let history = Arc::new(Mutex::new(ReadHistory::new()));
    let mut player = player(vec![table(
        "story",
        "*intro\nText,,,,,,,one\nText,,,,,,,two\n",
    )])
    .with_read_history(Box::new(Arc::clone(&history)));

    player.start("intro", 0, None);
    run_to_halt(&mut player);

    let history = history.lock().expect("history lock");
    assert!(history.is_page_read("intro", 0));
    assert!(history.is_page_read("intro", 1));
    assert!(!history.is_page_read("intro", 2));
    assert_eq!(history.last_save(), Some(&SavePoint::new("intro", 1)));
    assert_eq!(
        player.host().pages_ended,
        vec![("intro".to_string(), 0), ("intro".to_string(), 1)]
    );
}

#[test]
fn test_gallery_scene_is_recorded_when_it_ends() {
    let history = Arc::new(Mutex::new(ReadHistory::new()));
    let mut player = player(vec![table(
        "story",
        "*memory\nText,,,,,,,remember\nEndSceneGallery\nText,,,,,,,after\n",
    )])
    .with_gallery_labels(["memory"])
    .with_read_history(Box::new(Arc::clone(&history)));
    player.host_mut().text_done = false;

    player.start("memory", 0, None);
    player.tick();
    assert_eq!(player.gallery_label(), Some("memory"));

    player.host_mut().text_done = true;
    run_to_halt(&mut player);

    assert_eq!(player.gallery_label(), None);
    assert!(history.lock().expect("history lock").is_scene_viewed("memory"));
}

#[test]
fn test_gallery_scene_from_start_argument() {
    let history = Arc::new(Mutex::new(ReadHistory::new()));
    let mut player = player(vec![table(
        "story",
        "*plain\nEndSceneGallery\nEndSceneGallery\n",
    )])
    .with_read_history(Box::new(Arc::clone(&history)));

    player.start("plain", 0, Some("finale"));
    run_to_halt(&mut player);

    // The second EndSceneGallery has no scene to end and is ignored.
    assert_eq!(player.state(), &PlayerState::EndedNormally);
    let history = history.lock().expect("history lock");
    assert!(history.is_scene_viewed("finale"));
    assert!(!history.is_scene_viewed("plain"));
}

#[test]
fn test_stop_clears_gallery_scene() {
    let mut player = player(vec![table("story", "*memory\nText,,,,,,,remember\n")])
        .with_gallery_labels(["memory"]);
    player.host_mut().text_done = false;

    player.start("memory", 0, None);
    player.tick();
    player.stop();

    assert_eq!(player.gallery_label(), None);
}

#[test]
fn test_finished_gallery_scene_does_not_leak_into_next_run() {
    let history = Arc::new(Mutex::new(ReadHistory::new()));
    let mut player = player(vec![table(
        "story",
        "*memory\nText,,,,,,,remember\nEndScenario\n*other\nEndSceneGallery\n",
    )])
    .with_gallery_labels(["memory"])
    .with_read_history(Box::new(Arc::clone(&history)));

    player.start("memory", 0, None);
    run_to_halt(&mut player);
    assert_eq!(player.gallery_label(), None);

    player.start("other", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.state(), &PlayerState::EndedNormally);
    assert!(!history.lock().expect("history lock").is_scene_viewed("memory"));
}

#[test]
fn test_gallery_scene_carries_across_jump() {
    let history = Arc::new(Mutex::new(ReadHistory::new()));
    let mut player = player(vec![table(
        "story",
        "*memory\nJump,*epilogue\n*epilogue\nText,,,,,,,fin\nEndSceneGallery\n",
    )])
    .with_gallery_labels(["memory"])
    .with_read_history(Box::new(Arc::clone(&history)));

    player.start("memory", 0, None);
    run_to_halt(&mut player);

    assert_eq!(player.current_label(), "epilogue");
    assert!(history.lock().expect("history lock").is_scene_viewed("memory"));
}

#[derive(Debug)]
struct Shake {
    context: RowContext,
    strength: String,
}

impl Command for Shake {
    fn tag(&self) -> &str {
        "Shake"
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.host().send_message("shake", &[self.strength.clone()]);
    }
}

#[test]
fn test_registered_command_runs() {
    let mut player = player(vec![table(
        "story",
        "*intro\nShake,hard\nText,,,,,,,after\n",
    )]);
    player.register_command(
        "Shake",
        Arc::new(|row: &Row<'_>, _: &CommandSettings| {
            Ok(Arc::new(Shake {
                context: row.context(),
                strength: row.cell("Arg1").unwrap_or_default().to_string(),
            }) as Arc<dyn Command>)
        }),
    );

    player.start("intro", 0, None);
    run_to_halt(&mut player);

    assert_eq!(
        player.host().messages,
        vec![("shake".to_string(), vec!["hard".to_string()])]
    );
    assert_eq!(player.host().texts, vec!["after"]);
}

#[test]
fn test_send_message_forwards_arguments() {
    let mut player = player(vec![table(
        "story",
        "*intro\nSendMessage,unlock,door,,,,,now\n",
    )]);

    player.start("intro", 0, None);
    run_to_halt(&mut player);

    assert_eq!(
        player.host().messages,
        vec![(
            "unlock".to_string(),
            vec!["door".to_string(), "now".to_string()]
        )]
    );
}

#[test]
fn test_tween_is_handed_to_host_without_waiting() {
    let mut player = player(vec![table(
        "story",
        "*intro\nTween,bg,MoveTo,x=100 time=0.5,2\nTween,ann,Shake\nText,,,,,,,after\n",
    )]);

    player.start("intro", 0, None);
    run_to_halt(&mut player);

    assert_eq!(
        player.host().tweens,
        vec![
            Tween::new("bg", "MoveTo", "x=100 time=0.5", Some(2)),
            Tween::new("ann", "Shake", "", None),
        ]
    );
    assert_eq!(player.host().texts, vec!["after"]);
}

#[test]
fn test_tween_without_animation_is_dropped() {
    let mut player = player(vec![table(
        "story",
        "*intro\nTween,bg\nText,,,,,,,after\n",
    )]);

    player.start("intro", 0, None);
    run_to_halt(&mut player);

    assert!(player.host().tweens.is_empty());
    assert_eq!(player.host().texts, vec!["after"]);
}
