//! End-to-end screen tests: drive the app through keys and worker
//! completions and assert on what the terminal buffer shows.

mod common;

use common::harness::PetalTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};

use petal::model::post::Post;
use petal::services::api::{ApiEvent, ApiJob};
use petal::services::fetch::FetchError;

fn post(id: u64, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        summary: String::new(),
        tags: "art".to_string(),
        created_at: "2025-04-01T10:00:00Z".parse().unwrap(),
    }
}

fn posts_loaded(harness: &mut PetalTestHarness) {
    harness.apply(ApiEvent::Posts(Ok(vec![
        post(1, "spring sketches"),
        post(2, "brush pen practice"),
    ])));
    harness.drain_jobs();
}

fn expand_first(harness: &mut PetalTestHarness) -> petal::model::card::FetchTicket {
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE);
    for job in harness.drain_jobs() {
        if let ApiJob::FetchDetail { ticket, .. } = job {
            return ticket;
        }
    }
    panic!("expanding a remote card issued no fetch");
}

#[test]
fn test_blog_lists_posts_with_dates() {
    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    posts_loaded(&mut harness);
    harness.render().unwrap();

    harness.assert_screen_contains("spring sketches");
    harness.assert_screen_contains("brush pen practice");
    harness.assert_screen_contains("2025-04-01 · art");
    harness.assert_screen_contains("[guest]");
}

#[test]
fn test_expand_shows_loading_then_article() {
    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    posts_loaded(&mut harness);

    let ticket = expand_first(&mut harness);
    harness.render().unwrap();
    harness.assert_screen_contains("loading...");

    harness.apply(ApiEvent::Detail {
        ticket,
        result: Ok("Plum rain season again.".to_string()),
    });
    harness.render().unwrap();
    harness.assert_screen_contains("Plum rain season again.");
    harness.assert_screen_not_contains("loading...");
}

#[test]
fn test_fetch_failure_shows_error_with_retry_hint() {
    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    posts_loaded(&mut harness);

    let ticket = expand_first(&mut harness);
    harness.apply(ApiEvent::Detail {
        ticket,
        result: Err(FetchError::Status(404)),
    });
    harness.render().unwrap();

    harness.assert_screen_contains("404");
    harness.assert_screen_contains("Select the card again");
}

#[test]
fn test_escape_collapses_article() {
    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    posts_loaded(&mut harness);

    let ticket = expand_first(&mut harness);
    harness.apply(ApiEvent::Detail {
        ticket,
        result: Ok("Plum rain season again.".to_string()),
    });
    harness.render().unwrap();
    harness.assert_screen_contains("Plum rain season again.");

    harness.send_key(KeyCode::Esc, KeyModifiers::NONE);
    harness.render().unwrap();
    harness.assert_screen_not_contains("Plum rain season again.");
    // Collapsed card is still listed
    harness.assert_screen_contains("spring sketches");
}

#[test]
fn test_gallery_lightbox_opens_and_closes() {
    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE);
    harness.render().unwrap();
    harness.assert_screen_contains("Xunyi");
    harness.assert_screen_not_contains("First full-body piece.");

    harness.send_key(KeyCode::Enter, KeyModifiers::NONE);
    harness.render().unwrap();
    harness.assert_screen_contains("First full-body piece.");
    harness.assert_screen_contains("xunyi.png");

    harness.send_key(KeyCode::Esc, KeyModifiers::NONE);
    harness.render().unwrap();
    harness.assert_screen_not_contains("First full-body piece.");
}

#[test]
fn test_comment_wall_shows_entries_and_counter() {
    use petal::model::comment::Comment;

    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    harness.apply(ApiEvent::Comments(Ok(vec![Comment {
        id: 1,
        content: "love the new piece".to_string(),
        nickname: "mika".to_string(),
        ip: String::new(),
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0".to_string(),
        location: String::new(),
        created_at: "2025-04-02T08:00:00Z".parse().unwrap(),
    }])));

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE);
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE);
    harness.type_text("hi");
    harness.render().unwrap();

    harness.assert_screen_contains("mika");
    harness.assert_screen_contains("love the new piece");
    harness.assert_screen_contains("Firefox");
    harness.assert_screen_contains("(998 left)");
}

#[test]
fn test_login_prompt_masks_password() {
    let mut harness = PetalTestHarness::new(80, 24).unwrap();
    harness.send_key(KeyCode::Char('l'), KeyModifiers::CONTROL);
    harness.type_text("secret");
    harness.render().unwrap();

    harness.assert_screen_contains("password");
    harness.assert_screen_contains("******");
    harness.assert_screen_not_contains("secret");
}
