//! `chatreveal play`: reveals a reply in an inline terminal viewport.
//!
//! Finished bubbles are pushed into the scrollback above the viewport; the
//! viewport itself only ever shows the entry that is still revealing (or the
//! loading placeholder).

use std::error::Error;
use std::io::{self, Stdout};
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::widgets::{Paragraph, Widget};
use ratatui::{Terminal, TerminalOptions, Viewport};
use tracing::debug;

use crate::core::chain::{ChainObserver, ChainScheduler};
use crate::core::message::MessageEntry;
use crate::core::reveal::timer::TickDispatcher;
use crate::core::reveal::{RevealMode, RevealSettings};
use crate::text::Span;
use crate::ui::render::{prewrap_lines, render_entry};
use crate::ui::theme::Theme;

const VIEWPORT_HEIGHT: u16 = 6;

type InlineTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Command-line overrides layered over the configured reveal settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealOverrides {
    pub mode: Option<RevealMode>,
    pub interval_ms: Option<u64>,
    pub no_animation: bool,
}

impl RevealOverrides {
    pub fn apply(self, mut settings: RevealSettings) -> RevealSettings {
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(ms) = self.interval_ms {
            settings.interval = Duration::from_millis(ms);
        }
        if self.no_animation {
            settings.animation = false;
        }
        settings
    }
}

pub struct PlayOptions {
    pub text: String,
    pub blocks: Vec<String>,
    pub prompt: Option<String>,
    pub delay: Option<Duration>,
    pub settings: RevealSettings,
}

/// Marks the view dirty on every chain notification.
#[derive(Default)]
struct Redraw {
    dirty: bool,
}

impl Redraw {
    fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl ChainObserver for Redraw {
    fn on_entry_tick(&mut self, _index: usize, _visible: &[Span]) {
        self.dirty = true;
    }

    fn on_entry_complete(&mut self, _index: usize) {
        self.dirty = true;
    }

    fn on_entry_appended(&mut self, _index: usize) {
        self.dirty = true;
    }
}

/// Index of the entry that belongs in the live viewport.
fn live_index<O: ChainObserver>(chain: &ChainScheduler<O>) -> Option<usize> {
    chain.active_index().or_else(|| {
        let last = chain.entries().len().checked_sub(1)?;
        chain.entries()[last].is_loading.then_some(last)
    })
}

struct View {
    terminal: InlineTerminal,
    theme: Theme,
    flushed: usize,
}

impl View {
    fn new() -> io::Result<Self> {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(VIEWPORT_HEIGHT),
            },
        )?;
        Ok(Self {
            terminal,
            theme: Theme::default(),
            flushed: 0,
        })
    }

    fn refresh<O: ChainObserver>(&mut self, chain: &ChainScheduler<O>) -> io::Result<()> {
        let live = live_index(chain);
        self.flush_until(chain, live.unwrap_or(chain.entries().len()))?;

        let theme = &self.theme;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let lines = match live {
                Some(index) => {
                    let show_cursor =
                        chain.active_index() == Some(index) && chain.reveal().shows_cursor();
                    render_entry(
                        &chain.entries()[index],
                        &chain.visible_spans(index),
                        show_cursor,
                        theme,
                    )
                }
                None => Vec::new(),
            };
            let mut lines = prewrap_lines(&lines, area.width);
            // Keep the newest rows in view while a long entry grows.
            let overflow = lines.len().saturating_sub(usize::from(area.height));
            lines.drain(..overflow);
            frame.render_widget(Paragraph::new(lines), area);
        })?;
        Ok(())
    }

    /// Moves every entry before `end` into the scrollback, once.
    fn flush_until<O: ChainObserver>(
        &mut self,
        chain: &ChainScheduler<O>,
        end: usize,
    ) -> io::Result<()> {
        let width = self.terminal.size()?.width;
        while self.flushed < end {
            let index = self.flushed;
            let lines = render_entry(
                &chain.entries()[index],
                &chain.visible_spans(index),
                false,
                &self.theme,
            );
            let lines = prewrap_lines(&lines, width);
            let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
            self.terminal.insert_before(height, |buf| {
                Paragraph::new(lines).render(buf.area, buf);
            })?;
            self.flushed += 1;
        }
        Ok(())
    }

    fn finish<O: ChainObserver>(mut self, chain: &ChainScheduler<O>) -> io::Result<()> {
        self.flush_until(chain, chain.entries().len())?;
        self.terminal.clear()
    }
}

pub async fn run_play(options: PlayOptions) -> Result<(), Box<dyn Error>> {
    let (dispatcher, mut ticks) = TickDispatcher::new();
    let mut chain = ChainScheduler::new(dispatcher, options.settings, Redraw::default());
    let mut view = View::new()?;

    if let Some(prompt) = options.prompt {
        chain.push_entry(MessageEntry::user(prompt));
    }
    if let Some(delay) = options.delay {
        chain.set_pending(true);
        view.refresh(&chain)?;
        tokio::time::sleep(delay).await;
    }

    chain.resolve_pending(options.text, options.blocks);
    view.refresh(&chain)?;
    chain.observer_mut().take();

    while !chain.is_idle() {
        let Some(tick) = ticks.recv().await else {
            break;
        };
        chain.handle_tick(tick);
        if chain.observer_mut().take() {
            view.refresh(&chain)?;
        }
    }

    debug!(entries = chain.entries().len(), "playback finished");
    view.finish(&chain)?;
    Ok(())
}
