#![allow(non_snake_case)]
use treasure_box::{
    BOX_COUNT,
    Phase,
    RngSource,
    Session,
    SessionController,
    test_helpers::*,
};

#[test]
fn full_session__six_boxes_then_back_to_menu() {
    let mut controller = SessionController::new(RngSource::seeded(11));

    // given
    assert!(controller.start_new_game());
    assert_eq!(controller.session().phase(), Phase::Playing);
    assert!(controller.session().used_boxes().is_empty());

    // when
    let ticket = controller.select_box(2).unwrap();
    let reward = controller.complete_reveal(ticket).unwrap();

    // then
    assert_eq!(controller.session().phase(), Phase::Result);
    assert_eq!(controller.session().used_boxes(), &[2]);
    assert!(controller.catalog().contains(reward));

    // when
    controller.play_again();

    // then
    assert_eq!(controller.session().phase(), Phase::Playing);
    assert_eq!(controller.session().used_boxes(), &[2]);
    assert_eq!(controller.session().selected_box(), None);

    for box_index in [0, 1, 3, 4, 5] {
        let reward = open_box(&mut controller, box_index).unwrap();
        assert!(controller.catalog().contains(reward));
        assert_eq!(controller.session().phase(), Phase::Result);
        if box_index != 5 {
            controller.play_again();
        }
    }
    assert_eq!(controller.session().used_boxes().len(), BOX_COUNT);
    assert_eq!(controller.session().used_boxes(), &[2, 0, 1, 3, 4, 5]);

    // when
    controller.play_again();

    // then
    assert_eq!(controller.session().phase(), Phase::Menu);
    assert!(controller.session().used_boxes().is_empty());
    assert_eq!(controller.session(), &Session::default());
}

#[test]
fn rewards__are_drawn_with_replacement() {
    // given
    let mut controller = SessionController::new(ScriptedSource::repeating(7));
    controller.start_new_game();

    // when
    let rewards = open_boxes(&mut controller, &[0, 1, 2]);

    // then
    assert_eq!(rewards.len(), 3);
    assert!(rewards.iter().all(|r| *r == "canta una canzone cringe 🎵"));
}

#[test]
fn rewards__every_draw_samples_the_whole_catalog() {
    // given
    let mut controller = SessionController::new(ScriptedSource::new([0, 14, 3]));
    controller.start_new_game();

    // when
    let rewards = open_boxes(&mut controller, &[5, 4, 3]);

    // then
    assert_eq!(
        rewards,
        vec![
            "sub x5 🎉",
            "parla solo a gesti per 1 minuto 🤐",
            "fai 10 flessioni 💪",
        ]
    );
}

#[test]
fn reset_game__mid_session_clears_progress() {
    // given
    let mut controller = SessionController::new(ScriptedSource::repeating(1));
    controller.start_new_game();
    open_boxes(&mut controller, &[0, 1]);

    // when
    controller.reset_game();

    // then
    assert_eq!(controller.session(), &Session::default());
    assert!(controller.start_new_game());
    assert!(open_box(&mut controller, 0).is_some());
}

#[test]
fn reveal__stale_ticket_after_reset_does_not_leak_into_new_game() {
    // given
    let mut controller = SessionController::new(ScriptedSource::repeating(2));
    controller.start_new_game();
    let stale = controller.select_box(3).unwrap();
    controller.reset_game();
    controller.start_new_game();
    let fresh = controller.select_box(3).unwrap();

    // when
    let from_stale = controller.complete_reveal(stale);
    let from_fresh = controller.complete_reveal(fresh);

    // then
    assert!(from_stale.is_none());
    assert_eq!(from_fresh, Some("bevi qualcosa 🥤"));
    assert_eq!(controller.session().used_boxes(), &[3]);
}

#[test]
fn rejected_selections__leave_used_boxes_untouched() {
    // given
    let mut controller = SessionController::new(ScriptedSource::repeating(0));

    // when
    controller.select_box(0);
    controller.start_new_game();
    controller.select_box(6);
    controller.select_box(usize::MAX);
    open_box(&mut controller, 1);
    controller.select_box(1);

    // then
    assert_eq!(controller.session().used_boxes(), &[1]);
}
