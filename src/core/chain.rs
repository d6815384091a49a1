//! Sequential chaining of follow-on content blocks into separate bubbles.
//!
//! [`ChainScheduler`] owns the ordered list of [`MessageEntry`] values for one
//! conversation and the single [`RevealScheduler`] that animates its newest
//! assistant entry. When that reveal completes and the entry still carries
//! queued blocks, the head block becomes a new entry (inheriting the rest of
//! the queue) and is revealed in turn.

use std::collections::VecDeque;
use std::mem;

use tracing::debug;

use crate::core::message::{MessageEntry, RevealState, Role};
use crate::core::reveal::timer::{RevealTick, TickDispatcher};
use crate::core::reveal::{render_complete, RevealObserver, RevealScheduler, RevealSettings};
use crate::text::Span;

/// Notifications about entries in a [`ChainScheduler`]. Every method has a
/// no-op default.
pub trait ChainObserver {
    /// The active entry revealed one more step.
    fn on_entry_tick(&mut self, _index: usize, _visible: &[Span]) {}
    /// The entry at `index` finished revealing.
    fn on_entry_complete(&mut self, _index: usize) {}
    /// A new entry was appended at `index`.
    fn on_entry_appended(&mut self, _index: usize) {}
}

impl ChainObserver for () {}

/// Bridges the reveal scheduler back to the chain: ticks are forwarded with
/// the active entry index, completion is latched for the chain to consume.
struct ActiveReveal<O> {
    observer: O,
    entry: Option<usize>,
    completed: Option<usize>,
}

impl<O: ChainObserver> RevealObserver for ActiveReveal<O> {
    fn on_tick(&mut self, visible: &[Span]) {
        if let Some(index) = self.entry {
            self.observer.on_entry_tick(index, visible);
        }
    }

    fn on_complete(&mut self) {
        if let Some(index) = self.entry {
            self.completed = Some(index);
        }
    }
}

pub struct ChainScheduler<O: ChainObserver> {
    entries: Vec<MessageEntry>,
    reveal: RevealScheduler<ActiveReveal<O>>,
}

impl<O: ChainObserver> ChainScheduler<O> {
    pub fn new(dispatcher: TickDispatcher, settings: RevealSettings, observer: O) -> Self {
        let bridge = ActiveReveal {
            observer,
            entry: None,
            completed: None,
        };
        Self {
            entries: Vec::new(),
            reveal: RevealScheduler::new(dispatcher, settings, bridge),
        }
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    /// Index of the entry currently being revealed.
    pub fn active_index(&self) -> Option<usize> {
        self.reveal.observer().entry
    }

    pub fn reveal(&self) -> &RevealScheduler<impl RevealObserver> {
        &self.reveal
    }

    pub fn observer(&self) -> &O {
        &self.reveal.observer().observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.reveal.observer_mut().observer
    }

    /// Spans to draw for the entry at `index`: the live snapshot for the
    /// active entry, the full text for finished ones, nothing otherwise.
    pub fn visible_spans(&self, index: usize) -> Vec<Span> {
        if self.active_index() == Some(index) {
            return self.reveal.visible().to_vec();
        }
        match self.entries.get(index) {
            Some(entry) if entry.is_complete() => render_complete(&entry.content),
            _ => Vec::new(),
        }
    }

    /// Appends an entry to the conversation.
    ///
    /// User entries, already-complete entries and loading placeholders are
    /// appended as they are. Any other entry becomes the active one and starts
    /// revealing; an entry that was still revealing is settled first so that
    /// only the newest entry is ever animated.
    pub fn push_entry(&mut self, mut entry: MessageEntry) -> usize {
        self.settle_active();

        if entry.role.is_user() {
            entry.reveal_state = RevealState::Complete;
        }
        if entry.is_complete() || entry.is_loading {
            return self.append(entry);
        }

        let index = self.append_and_start(entry);
        self.process_completion();
        index
    }

    /// Appends historical entries fully formed; queued blocks are expanded
    /// in place as finished entries.
    pub fn push_history<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = MessageEntry>,
    {
        self.settle_active();
        for mut entry in entries {
            entry.reveal_state = RevealState::Complete;
            entry.is_loading = false;
            let blocks = mem::take(&mut entry.remaining_blocks);
            let role = entry.role;
            self.append(entry);
            self.append_settled_blocks(role, blocks);
        }
    }

    /// Shows or clears the loading placeholder that stands in for a reply
    /// still being produced. The placeholder only follows a user entry.
    pub fn set_pending(&mut self, pending: bool) {
        let last = self.entries.last();
        if pending {
            if last.is_some_and(|entry| entry.role.is_user()) {
                self.append(MessageEntry::loading());
            }
        } else if last.is_some_and(|entry| entry.is_loading) {
            self.entries.pop();
        }
    }

    /// Replaces the loading placeholder with the reply and starts revealing
    /// it. Without a placeholder the reply is simply pushed.
    pub fn resolve_pending<I, S>(&mut self, content: impl Into<String>, blocks: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.entries.last().is_some_and(|entry| entry.is_loading) {
            self.entries.pop();
        }
        self.push_entry(MessageEntry::assistant(content).with_blocks(blocks))
    }

    /// Replaces the text of the active entry. The reveal restarts from zero
    /// for different text and is left alone for identical text.
    pub fn set_active_content(&mut self, content: &str) -> bool {
        let Some(index) = self.active_index() else {
            return false;
        };
        if let Some(entry) = self.entries.get_mut(index) {
            entry.content = content.to_string();
        }
        self.reveal.set_source(content);
        self.process_completion();
        true
    }

    /// Feeds one timer tick to the active reveal.
    pub fn handle_tick(&mut self, tick: RevealTick) -> bool {
        let consumed = self.reveal.handle_tick(tick);
        self.process_completion();
        consumed
    }

    /// Skips the rest of the active entry's animation. Chaining continues
    /// normally with the next block.
    pub fn finish_active(&mut self) {
        self.reveal.finish_now();
        self.process_completion();
    }

    /// Whether anything is still animating or queued behind the animation.
    pub fn is_idle(&self) -> bool {
        self.active_index().is_none()
    }

    /// Clears the conversation. The armed timer is cleared first.
    pub fn reset(&mut self) {
        self.reveal.cancel();
        let bridge = self.reveal.observer_mut();
        bridge.entry = None;
        bridge.completed = None;
        self.entries.clear();
        debug!("conversation reset");
    }

    fn append(&mut self, entry: MessageEntry) -> usize {
        let index = self.entries.len();
        self.entries.push(entry);
        self.observer_mut().on_entry_appended(index);
        index
    }

    fn append_and_start(&mut self, mut entry: MessageEntry) -> usize {
        entry.reveal_state = RevealState::Revealing;
        let content = entry.content.clone();
        let index = self.append(entry);
        self.reveal.observer_mut().entry = Some(index);
        self.reveal.start(content);
        index
    }

    fn append_settled_blocks(&mut self, role: Role, blocks: VecDeque<String>) {
        for block in blocks {
            let mut entry = MessageEntry::new(role, block).completed();
            entry.is_sub_message = true;
            self.append(entry);
        }
    }

    fn process_completion(&mut self) {
        while let Some(index) = self.reveal.observer_mut().completed.take() {
            self.on_reveal_complete(index);
        }
    }

    fn on_reveal_complete(&mut self, index: usize) {
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        // Repeat notifications for an entry that already completed are no-ops.
        if entry.is_complete() {
            return;
        }
        entry.reveal_state = RevealState::Complete;
        let next = entry.remaining_blocks.pop_front();
        let rest = mem::take(&mut entry.remaining_blocks);
        let role = entry.role;

        if self.reveal.observer().entry == Some(index) {
            self.reveal.observer_mut().entry = None;
        }
        self.observer_mut().on_entry_complete(index);

        if let Some(block) = next {
            debug!(from = index, queued = rest.len(), "chaining next block");
            let mut follow_on = MessageEntry::new(role, block);
            follow_on.remaining_blocks = rest;
            follow_on.is_sub_message = true;
            self.append_and_start(follow_on);
        }
    }

    /// Completes the active entry immediately, without animation, along with
    /// every block still queued behind it.
    fn settle_active(&mut self) {
        let Some(index) = self.reveal.observer_mut().entry.take() else {
            return;
        };
        self.reveal.cancel();
        self.reveal.observer_mut().completed = None;

        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        entry.reveal_state = RevealState::Complete;
        let blocks = mem::take(&mut entry.remaining_blocks);
        let role = entry.role;
        debug!(index, queued = blocks.len(), "active entry settled early");

        self.observer_mut().on_entry_complete(index);
        self.append_settled_blocks(role, blocks);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::reveal::timer::TickReceiver;
    use crate::text::plain_text;
    use tokio::time;

    #[derive(Default)]
    struct Events {
        appended: Vec<usize>,
        completed: Vec<usize>,
        ticks: usize,
    }

    impl ChainObserver for Events {
        fn on_entry_tick(&mut self, _index: usize, _visible: &[Span]) {
            self.ticks += 1;
        }

        fn on_entry_complete(&mut self, index: usize) {
            self.completed.push(index);
        }

        fn on_entry_appended(&mut self, index: usize) {
            self.appended.push(index);
        }
    }

    fn chain(settings: RevealSettings) -> (ChainScheduler<Events>, TickReceiver) {
        let (dispatcher, rx) = TickDispatcher::new();
        (ChainScheduler::new(dispatcher, settings, Events::default()), rx)
    }

    fn fast() -> RevealSettings {
        RevealSettings::default().with_interval(Duration::from_millis(5))
    }

    /// Drives ticks until the currently active entry completes.
    async fn run_active(chain: &mut ChainScheduler<Events>, rx: &mut TickReceiver) {
        let Some(index) = chain.active_index() else {
            return;
        };
        while chain.active_index() == Some(index) {
            let tick = rx.recv().await.expect("tick channel closed");
            chain.handle_tick(tick);
        }
    }

    fn contents(chain: &ChainScheduler<Events>) -> Vec<&str> {
        chain.entries().iter().map(|e| e.content.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn completion_appends_exactly_one_follow_on_block() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("A").with_blocks(["B", "C"]));
        assert_eq!(chain.active_index(), Some(0));

        run_active(&mut chain, &mut rx).await;

        assert_eq!(contents(&chain), vec!["A", "B"]);
        let a = &chain.entries()[0];
        assert_eq!(a.reveal_state, RevealState::Complete);
        assert!(a.remaining_blocks.is_empty());

        let b = &chain.entries()[1];
        assert_eq!(b.reveal_state, RevealState::Revealing);
        assert_eq!(b.remaining_blocks, VecDeque::from(["C".to_string()]));
        assert!(b.is_sub_message);
        assert_eq!(chain.active_index(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn blocks_reveal_in_fifo_order() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("one").with_blocks(["two", "three"]));

        run_active(&mut chain, &mut rx).await;
        assert_eq!(contents(&chain), vec!["one", "two"]);
        run_active(&mut chain, &mut rx).await;
        assert_eq!(contents(&chain), vec!["one", "two", "three"]);
        run_active(&mut chain, &mut rx).await;

        assert!(chain.is_idle());
        assert!(chain.entries().iter().all(MessageEntry::is_complete));
        assert_eq!(chain.observer().completed, vec![0, 1, 2]);
        assert_eq!(chain.observer().appended, vec![0, 1, 2]);
        assert_eq!(chain.observer().ticks, 3 + 3 + 5);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_completion_does_not_dequeue_twice() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("A").with_blocks(["B", "C"]));
        run_active(&mut chain, &mut rx).await;

        chain.reveal.observer_mut().completed = Some(0);
        chain.process_completion();
        chain.on_reveal_complete(0);

        assert_eq!(contents(&chain), vec!["A", "B"]);
        assert_eq!(chain.observer().completed, vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_animation_chains_everything_at_once() {
        let (mut chain, _rx) = chain(fast().with_animation(false));
        chain.push_entry(MessageEntry::assistant("A").with_blocks(["B", "C"]));

        assert_eq!(contents(&chain), vec!["A", "B", "C"]);
        assert!(chain.entries().iter().all(MessageEntry::is_complete));
        assert!(chain.is_idle());
        assert_eq!(chain.reveal().armed_reveal_id(), None);
        assert_eq!(chain.visible_spans(2), vec![Span::plain("C")]);
    }

    #[tokio::test(start_paused = true)]
    async fn history_renders_fully_formed() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_history([
            MessageEntry::user("hi"),
            MessageEntry::assistant("**hello**").with_blocks(["again"]),
        ]);

        assert_eq!(contents(&chain), vec!["hi", "**hello**", "again"]);
        assert!(chain.entries().iter().all(MessageEntry::is_complete));
        assert!(chain.entries()[2].is_sub_message);
        assert_eq!(chain.visible_spans(1), vec![Span::bold("hello")]);
        assert!(chain.is_idle());

        let tick = time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(tick.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn user_entries_never_animate() {
        let (mut chain, _rx) = chain(fast());
        let index = chain.push_entry(MessageEntry::new(Role::User, "question"));
        assert!(chain.entries()[index].is_complete());
        assert!(chain.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn new_entry_settles_the_active_one() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("long answer").with_blocks(["tail"]));
        let tick = rx.recv().await.unwrap();
        chain.handle_tick(tick);

        chain.push_entry(MessageEntry::user("interrupt"));

        assert_eq!(contents(&chain), vec!["long answer", "tail", "interrupt"]);
        assert!(chain.entries().iter().all(MessageEntry::is_complete));
        assert!(chain.is_idle());
        assert_eq!(chain.reveal().armed_reveal_id(), None);
        assert_eq!(chain.visible_spans(0), vec![Span::plain("long answer")]);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_placeholder_resolves_into_reveal() {
        let (mut chain, mut rx) = chain(fast());
        chain.set_pending(true);
        assert!(chain.entries().is_empty(), "placeholder only follows a user entry");

        chain.push_entry(MessageEntry::user("hello?"));
        chain.set_pending(true);
        assert!(chain.entries()[1].is_loading);
        assert!(chain.visible_spans(1).is_empty());

        let index = chain.resolve_pending("Hi", ["there"]);
        assert_eq!(index, 1);
        assert!(!chain.entries()[1].is_loading);
        assert_eq!(chain.active_index(), Some(1));

        run_active(&mut chain, &mut rx).await;
        run_active(&mut chain, &mut rx).await;
        assert_eq!(contents(&chain), vec!["hello?", "Hi", "there"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_pending_removes_placeholder() {
        let (mut chain, _rx) = chain(fast());
        chain.push_entry(MessageEntry::user("hello?"));
        chain.set_pending(true);
        chain.set_pending(false);
        assert_eq!(contents(&chain), vec!["hello?"]);
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_active_content_restarts_reveal() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("first draft"));
        for _ in 0..3 {
            let tick = rx.recv().await.unwrap();
            chain.handle_tick(tick);
        }

        assert!(chain.set_active_content("final"));
        assert_eq!(chain.reveal().progress(), (0, 5));
        run_active(&mut chain, &mut rx).await;

        assert_eq!(contents(&chain), vec!["final"]);
        assert_eq!(plain_text(&chain.visible_spans(0)), "final");
        assert_eq!(chain.observer().completed, vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_active_still_chains() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("skip me").with_blocks(["next"]));
        chain.finish_active();

        assert_eq!(contents(&chain), vec!["skip me", "next"]);
        assert_eq!(chain.active_index(), Some(1));
        run_active(&mut chain, &mut rx).await;
        assert!(chain.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_timer_and_entries() {
        let (mut chain, mut rx) = chain(fast());
        chain.push_entry(MessageEntry::assistant("going away"));
        let id = chain.reveal().armed_reveal_id().unwrap();

        chain.reset();

        assert!(chain.entries().is_empty());
        assert!(chain.is_idle());
        assert_eq!(chain.reveal().armed_reveal_id(), None);
        assert!(!chain.handle_tick(RevealTick { reveal_id: id }));
        let tick = time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(tick.is_err());
    }
}
