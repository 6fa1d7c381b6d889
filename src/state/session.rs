use crate::types::*;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Where a chat's game currently stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    /// No host, no word
    #[default]
    Idle,
    /// Host assigned, word not chosen yet
    AwaitingReveal { host: UserId },
    /// Round is live
    WordHidden {
        host: UserId,
        word: String,
        set_at: DateTime<Utc>,
    },
    /// Word was guessed; the winner is the new host
    RoundWon {
        winner: UserId,
        won_at: DateTime<Utc>,
    },
}

/// Per-chat game state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSession {
    phase: SessionPhase,
    last_round_start_at: Option<DateTime<Utc>>,
}

/// Time left until `since + window`, or `None` if the window has passed
fn remaining(since: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> Option<Duration> {
    // A clock that went backwards counts as no time elapsed
    let elapsed = (now - since).to_std().unwrap_or_default();
    window.checked_sub(elapsed).filter(|left| !left.is_zero())
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn state_name(&self) -> &'static str {
        match self.phase {
            SessionPhase::Idle => "idle",
            SessionPhase::AwaitingReveal { .. } => "awaiting_reveal",
            SessionPhase::WordHidden { .. } => "word_hidden",
            SessionPhase::RoundWon { .. } => "round_won",
        }
    }

    /// The participant currently responsible for hiding a word
    pub fn host(&self) -> Option<UserId> {
        match self.phase {
            SessionPhase::Idle => None,
            SessionPhase::AwaitingReveal { host } | SessionPhase::WordHidden { host, .. } => {
                Some(host)
            }
            SessionPhase::RoundWon { winner, .. } => Some(winner),
        }
    }

    pub fn is_host(&self, user: UserId) -> bool {
        self.host() == Some(user)
    }

    pub fn secret_word(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::WordHidden { word, .. } => Some(word),
            _ => None,
        }
    }

    /// Winner of the round that just ended
    pub fn last_guesser(&self) -> Option<UserId> {
        match self.phase {
            SessionPhase::RoundWon { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// When the live word was hidden or the last round was won
    pub fn word_set_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            SessionPhase::WordHidden { set_at, .. } => Some(set_at),
            SessionPhase::RoundWon { won_at, .. } => Some(won_at),
            _ => None,
        }
    }

    pub fn last_round_start_at(&self) -> Option<DateTime<Utc>> {
        self.last_round_start_at
    }

    /// How long until another game may be started, if at all
    pub fn cooldown_remaining(&self, now: DateTime<Utc>, cooldown: Duration) -> Option<Duration> {
        self.last_round_start_at
            .and_then(|started| remaining(started, now, cooldown))
    }

    /// How long `user` still has to wait before taking over after a win.
    /// The winner never waits.
    pub fn grace_remaining(
        &self,
        user: UserId,
        now: DateTime<Utc>,
        grace: Duration,
    ) -> Option<Duration> {
        match self.phase {
            SessionPhase::RoundWon { winner, .. } if winner == user => None,
            SessionPhase::RoundWon { won_at, .. } => remaining(won_at, now, grace),
            _ => None,
        }
    }

    /// Begin a game with `host` hiding the first word. Any live word is dropped.
    pub fn start(&mut self, host: UserId, now: DateTime<Utc>) {
        self.phase = SessionPhase::AwaitingReveal { host };
        self.last_round_start_at = Some(now);
    }

    /// Hide a fresh word, replacing any previous one
    pub fn hide_word(&mut self, host: UserId, word: String, now: DateTime<Utc>) {
        self.phase = SessionPhase::WordHidden {
            host,
            word,
            set_at: now,
        };
    }

    /// Record a correct guess. Returns the guessed word, or `None` if no word
    /// was live or the guesser is the host.
    pub fn record_win(&mut self, winner: UserId, now: DateTime<Utc>) -> Option<String> {
        match &self.phase {
            SessionPhase::WordHidden { host, word, .. } if *host != winner => {
                let word = word.clone();
                self.phase = SessionPhase::RoundWon {
                    winner,
                    won_at: now,
                };
                Some(word)
            }
            _ => None,
        }
    }

    /// Make `host` responsible for the next word after a won round
    pub fn hand_over(&mut self, host: UserId) {
        self.phase = SessionPhase::AwaitingReveal { host };
    }

    /// True when nothing distinguishes this session from one created on demand.
    /// Only such sessions may be forgotten.
    pub fn is_fresh(&self) -> bool {
        self.phase == SessionPhase::Idle && self.last_round_start_at.is_none()
    }

    /// Structural invariants that must hold after every transition
    pub fn invariants_hold(&self) -> bool {
        match self.secret_word() {
            Some(_) => self.host().is_some() && self.last_guesser().is_none(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new();
        assert_eq!(session.phase(), &SessionPhase::Idle);
        assert_eq!(session.host(), None);
        assert_eq!(session.secret_word(), None);
        assert_eq!(session.last_guesser(), None);
        assert_eq!(session.last_round_start_at(), None);
        assert_eq!(session.state_name(), "idle");
    }

    #[test]
    fn test_start_drops_live_word() {
        let mut session = GameSession::new();
        session.hide_word(1, "apple".to_string(), at(0));
        session.start(2, at(10));

        assert_eq!(session.phase(), &SessionPhase::AwaitingReveal { host: 2 });
        assert_eq!(session.secret_word(), None);
        assert_eq!(session.last_round_start_at(), Some(at(10)));
    }

    #[test]
    fn test_cooldown_remaining() {
        let mut session = GameSession::new();
        let cooldown = Duration::from_secs(180);
        assert_eq!(session.cooldown_remaining(at(0), cooldown), None);

        session.start(1, at(0));
        assert_eq!(
            session.cooldown_remaining(at(60), cooldown),
            Some(Duration::from_secs(120))
        );
        assert_eq!(session.cooldown_remaining(at(180), cooldown), None);
        assert_eq!(session.cooldown_remaining(at(500), cooldown), None);
    }

    #[test]
    fn test_clock_going_backwards_counts_as_no_time() {
        let mut session = GameSession::new();
        session.start(1, at(100));
        assert_eq!(
            session.cooldown_remaining(at(50), Duration::from_secs(180)),
            Some(Duration::from_secs(180))
        );
    }

    #[test]
    fn test_only_untouched_sessions_are_fresh() {
        let mut session = GameSession::new();
        assert!(session.is_fresh());

        session.hide_word(1, "apple".to_string(), at(0));
        assert!(!session.is_fresh());

        let mut started = GameSession::new();
        started.start(1, at(0));
        assert!(!started.is_fresh());
    }

    #[test]
    fn test_host_cannot_win_own_word() {
        let mut session = GameSession::new();
        session.hide_word(1, "apple".to_string(), at(0));

        assert_eq!(session.record_win(1, at(1)), None);
        assert_eq!(session.secret_word(), Some("apple"));

        assert_eq!(session.record_win(2, at(1)), Some("apple".to_string()));
        assert_eq!(session.host(), Some(2));
        assert_eq!(session.last_guesser(), Some(2));
        assert_eq!(session.word_set_at(), Some(at(1)));
        assert!(session.invariants_hold());
    }

    #[test]
    fn test_record_win_without_word_is_noop() {
        let mut session = GameSession::new();
        session.start(1, at(0));
        assert_eq!(session.record_win(2, at(1)), None);
        assert_eq!(session.phase(), &SessionPhase::AwaitingReveal { host: 1 });
    }

    #[test]
    fn test_grace_remaining() {
        let grace = Duration::from_secs(5);
        let mut session = GameSession::new();
        session.hide_word(1, "apple".to_string(), at(0));
        session.record_win(2, at(10));

        assert_eq!(session.grace_remaining(2, at(10), grace), None);
        assert_eq!(
            session.grace_remaining(3, at(12), grace),
            Some(Duration::from_secs(3))
        );
        assert_eq!(session.grace_remaining(3, at(15), grace), None);
    }

    #[test]
    fn test_hiding_clears_last_guesser() {
        let mut session = GameSession::new();
        session.hide_word(1, "apple".to_string(), at(0));
        session.record_win(2, at(1));
        session.hand_over(2);
        assert_eq!(session.last_guesser(), None);

        session.hide_word(2, "river".to_string(), at(2));
        assert_eq!(session.secret_word(), Some("river"));
        assert_eq!(session.last_guesser(), None);
        assert!(session.invariants_hold());
    }
}
