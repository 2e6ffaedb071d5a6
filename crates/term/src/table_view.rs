//! TableView: maps engine state to a text frame.
//!
//! Layout, top to bottom: header, draw pile and active card, four lane
//! columns, the round banner, a status line and the key help.

use run21_core::scoring::lane_total;
use run21_core::Deck;
use run21_engine::{Engine, PopupKind, Sound, TimedPresenter, UndoPhase};
use run21_types::{Card, Lane, Rank, Suit, MAX_BUSTS};

use crate::frame::{Frame, Line, Tone};

const COLUMN_WIDTH: usize = 18;
const LANE_ROWS: usize = 6;

/// Two-glyph label for a card, e.g. `K♥` or `10♣`
pub fn card_label(card: &Card) -> String {
    let rank = match card.rank() {
        Rank::Ten => "10".to_string(),
        r => r.as_char().to_string(),
    };
    let suit = match card.suit() {
        Suit::Club => '♣',
        Suit::Diamond => '♦',
        Suit::Heart => '♥',
        Suit::Spade => '♠',
    };
    format!("{}{}", rank, suit)
}

fn card_tone(card: &Card) -> Tone {
    if card.suit().is_black() {
        Tone::BlackSuit
    } else {
        Tone::RedSuit
    }
}

fn is_round_popup(kind: &PopupKind) -> bool {
    matches!(
        kind,
        PopupKind::OutOfTime | PopupKind::EmptyLane(_) | PopupKind::NoBust | PopupKind::PerfectGame
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TableView;

impl TableView {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: Sound>(&self, engine: &Engine<TimedPresenter, S>) -> Frame {
        let mut frame = Frame::new();
        self.render_header(engine, &mut frame);
        frame.blank();
        self.render_draw(engine, &mut frame);
        frame.blank();
        self.render_lanes(engine, &mut frame);
        frame.blank();
        self.render_banner(engine, &mut frame);
        self.render_status(engine, &mut frame);
        frame.push_text(
            "[1-4/asdf] play  [u] undo  [n] instant undo  [p] pause  [r] restart  [q] quit",
            Tone::Dim,
        );
        frame
    }

    fn render_header<S: Sound>(&self, engine: &Engine<TimedPresenter, S>, frame: &mut Frame) {
        let game = engine.game();
        let secs = game.time_left_ms() / 1000;
        let mut line = Line::new();
        line.push(format!("21 RUN  round {}", game.round_id()), Tone::Title)
            .push(format!("   score {}", game.score().total()), Tone::Normal)
            .push(format!("   time {}:{:02}", secs / 60, secs % 60), Tone::Normal)
            .push(
                format!("   busts {}/{}", game.busted(), MAX_BUSTS),
                if game.busted() + 1 >= MAX_BUSTS {
                    Tone::Warning
                } else {
                    Tone::Normal
                },
            )
            .push(format!("   streak {}", game.streak()), Tone::Normal);
        frame.push(line);
    }

    fn render_draw<S: Sound>(&self, engine: &Engine<TimedPresenter, S>, frame: &mut Frame) {
        let game = engine.game();
        let mut line = Line::new();
        line.push(format!("draw {:>2}   ", game.draw().len()), Tone::Dim);
        match game.active_card() {
            Some(card) => {
                line.push("next ", Tone::Normal)
                    .push(card_label(card), card_tone(card));
            }
            None => {
                line.push("next --", Tone::Dim);
            }
        }
        frame.push(line);
    }

    fn render_lanes<S: Sound>(&self, engine: &Engine<TimedPresenter, S>, frame: &mut Frame) {
        let game = engine.game();

        let mut titles = Line::new();
        let mut totals = Line::new();
        for lane in Lane::ALL {
            let deck = game.lane(lane);
            let col = (lane.index() + 1) * COLUMN_WIDTH;
            titles.push(format!("lane {}", lane.index() + 1), Tone::Title);
            titles.pad_to(col);
            totals.push(total_label(deck), Tone::Dim);
            totals.pad_to(col);
        }
        frame.push(titles);
        frame.push(totals);

        for row in 0..LANE_ROWS {
            let mut line = Line::new();
            for lane in Lane::ALL {
                if let Some(card) = game.lane(lane).cards().get(row) {
                    line.push(card_label(card), card_tone(card));
                }
                line.pad_to((lane.index() + 1) * COLUMN_WIDTH);
            }
            frame.push(line);
        }

        let mut popups = Line::new();
        for (i, lane) in Lane::ALL.into_iter().enumerate() {
            if let Some(kind) = engine.sequencer().showing(lane) {
                popups.push(kind.to_string(), Tone::Popup);
            }
            popups.pad_to((i + 1) * COLUMN_WIDTH);
        }
        frame.push(popups);
    }

    fn render_banner<S: Sound>(&self, engine: &Engine<TimedPresenter, S>, frame: &mut Frame) {
        let banner: Vec<String> = engine
            .presenter()
            .visible_popups()
            .filter(is_round_popup)
            .map(|k| k.to_string())
            .collect();
        frame.push_text(banner.join("   "), Tone::Popup);
    }

    fn render_status<S: Sound>(&self, engine: &Engine<TimedPresenter, S>, frame: &mut Frame) {
        let game = engine.game();
        let snapshots = engine.snapshots();
        let (text, tone) = if game.game_over() {
            (format!("GAME OVER  final score {}", game.score().total()), Tone::Warning)
        } else if game.paused() {
            ("PAUSED".to_string(), Tone::Warning)
        } else if let Some(ghost) = snapshots.ghost() {
            (format!("undo: dealing back {} cards", ghost.len()), Tone::Dim)
        } else if snapshots.phase() == UndoPhase::AwaitingLegs {
            ("undo: returning cards".to_string(), Tone::Dim)
        } else if snapshots.is_undo_available() {
            ("undo available".to_string(), Tone::Dim)
        } else {
            (String::new(), Tone::Normal)
        };
        frame.push_text(text, tone);
    }
}

fn total_label(deck: &Deck) -> String {
    if deck.is_empty() {
        return "--".to_string();
    }
    let total = lane_total(deck.cards());
    if total.is_soft() {
        format!("{}/{}", total.hard, total.best)
    } else {
        total.best.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run21_core::{Game, Pile};
    use run21_engine::{EngineConfig, Silent};
    use run21_types::GameAction;

    fn engine(shoe: &str) -> Engine<TimedPresenter, Silent> {
        let game = Game::from_shoe(Card::parse(shoe).unwrap());
        Engine::new(game, EngineConfig::default(), TimedPresenter::new(), Silent)
    }

    #[test]
    fn test_card_label() {
        let cards = Card::parse("Th Kc As 2d").unwrap();
        let labels: Vec<String> = cards.iter().map(card_label).collect();
        assert_eq!(labels, vec!["10♥", "K♣", "A♠", "2♦"]);
        assert_eq!(card_tone(&cards[0]), Tone::RedSuit);
        assert_eq!(card_tone(&cards[1]), Tone::BlackSuit);
    }

    #[test]
    fn test_total_label_soft_and_empty() {
        let lane = Pile::Lane(Lane::new(0));
        assert_eq!(total_label(&Deck::new(lane)), "--");
        assert_eq!(total_label(&Deck::from_cards(lane, Card::parse("Ah 6c").unwrap())), "7/17");
        assert_eq!(total_label(&Deck::from_cards(lane, Card::parse("Kh 6c").unwrap())), "16");
    }

    #[test]
    fn test_render_shows_active_card_and_lanes() {
        let mut engine = engine("Kh 9c 5d 2s");
        engine.apply(GameAction::Play(Lane::new(1))).unwrap();

        let frame = TableView::new().render(&engine);
        assert!(frame.contains("next 9♣"));
        assert!(frame.contains("K♥"));
        assert!(frame.contains("undo available"));
        assert!(frame.contains("lane 4"));
    }

    #[test]
    fn test_render_lane_popup_and_pause() {
        let mut engine = engine("Kh As 5d 2s 3c");
        engine.apply(GameAction::Play(Lane::new(0))).unwrap();
        engine.apply(GameAction::Play(Lane::new(0))).unwrap();

        let frame = TableView::new().render(&engine);
        assert!(frame.contains("21!"));

        engine.apply(GameAction::Pause).unwrap();
        assert!(TableView::new().render(&engine).contains("PAUSED"));
    }
}
