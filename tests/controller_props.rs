//! Property tests over random operation sequences: whatever order cards are
//! expanded, collapsed, dismissed, and completed in, the controller never
//! shows two expanded cards and never paints a result onto the wrong card.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use petal::controller::{CardDetailController, Strategy as ExpandStrategy};
use petal::model::card::{Card, CardId, DetailState, FetchTicket, InlineFields};
use petal::services::fetch::{DetailFetcher, FetchError};
use petal::services::markup::CmarkRenderer;
use petal::view::theme::Theme;

#[derive(Clone, Default)]
struct RecordingFetcher {
    tickets: Arc<Mutex<Vec<FetchTicket>>>,
}

impl DetailFetcher for RecordingFetcher {
    fn fetch(&self, ticket: FetchTicket, _location: &str) {
        self.tickets.lock().unwrap().push(ticket);
    }
}

#[derive(Debug, Clone)]
enum Op {
    Expand(u8),
    Collapse(u8),
    Dismiss,
    /// Complete the oldest outstanding fetch, successfully or not.
    CompleteOldest(bool),
    /// Deliver a result with a ticket that was never issued.
    CompleteBogus(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::Expand),
        (0u8..6).prop_map(Op::Collapse),
        Just(Op::Dismiss),
        any::<bool>().prop_map(Op::CompleteOldest),
        (0u8..6).prop_map(Op::CompleteBogus),
    ]
}

fn seeded_controller() -> (CardDetailController, RecordingFetcher) {
    let fetcher = RecordingFetcher::default();
    let mut controller = CardDetailController::new(ExpandStrategy::ExpandInPlace)
        .with_fetcher(Box::new(fetcher.clone()))
        .with_renderer(Box::new(CmarkRenderer::new(Theme::dark())));
    controller.register(
        (0..5u64)
            .map(|id| {
                if id % 2 == 0 {
                    Card::remote(CardId(id), format!("post {id}"), format!("/{id}.md"))
                } else {
                    Card::inline(
                        CardId(id),
                        format!("piece {id}"),
                        InlineFields {
                            title: format!("piece {id}"),
                            image: None,
                            excerpt: "inline".to_string(),
                        },
                    )
                }
            })
            .collect(),
    );
    (controller, fetcher)
}

fn check_invariants(controller: &CardDetailController) {
    let expanded: Vec<_> = controller.cards().iter().filter(|c| c.expanded).collect();
    assert!(expanded.len() <= 1, "more than one card expanded");
    match expanded.first() {
        Some(card) => assert_eq!(controller.expanded(), Some(card.id)),
        None => assert_eq!(controller.expanded(), None),
    }
    for card in controller.cards() {
        if !card.expanded {
            assert!(
                card.detail.is_absent(),
                "collapsed card {:?} still holds a detail view",
                card.id
            );
        }
        if card.detail.is_loading() {
            assert_eq!(controller.expanded(), Some(card.id));
        }
    }
}

proptest! {
    #[test]
    fn prop_mutual_exclusion_holds(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        let (mut controller, fetcher) = seeded_controller();

        for op in ops {
            match op {
                Op::Expand(id) => controller.expand(CardId(id as u64)),
                Op::Collapse(id) => controller.collapse(CardId(id as u64)),
                Op::Dismiss => controller.dismiss(),
                Op::CompleteOldest(ok) => {
                    let ticket = {
                        let mut tickets = fetcher.tickets.lock().unwrap();
                        if tickets.is_empty() {
                            continue;
                        }
                        tickets.remove(0)
                    };
                    let result = if ok {
                        Ok("some body".to_string())
                    } else {
                        Err(FetchError::Status(500))
                    };
                    controller.complete_fetch(ticket, result);
                }
                Op::CompleteBogus(id) => {
                    let ticket = FetchTicket { card: CardId(id as u64), seq: u64::MAX };
                    controller.complete_fetch(ticket, Ok("bogus".to_string()));
                }
            }
            check_invariants(&controller);
        }
    }

    #[test]
    fn prop_ready_content_comes_from_latest_ticket(reexpands in 1usize..6) {
        let (mut controller, fetcher) = seeded_controller();

        // Expand and collapse the same remote card repeatedly, leaving a
        // trail of stale tickets, then expand once more.
        for _ in 0..reexpands {
            controller.expand(CardId(0));
            controller.collapse(CardId(0));
        }
        controller.expand(CardId(0));

        let tickets: Vec<_> = fetcher.tickets.lock().unwrap().clone();
        let (last, stale) = tickets.split_last().unwrap();

        for ticket in stale {
            controller.complete_fetch(*ticket, Ok("stale".to_string()));
            let card = controller.card(CardId(0)).unwrap();
            prop_assert!(card.detail.is_loading(), "stale result was committed");
        }

        controller.complete_fetch(*last, Ok("fresh".to_string()));
        match &controller.card(CardId(0)).unwrap().detail {
            DetailState::Ready { lines } => {
                prop_assert!(lines.iter().any(|l| l.text().contains("fresh")));
            }
            other => prop_assert!(false, "expected Ready, got {other:?}"),
        }
    }
}
