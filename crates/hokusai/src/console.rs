//! Text-mode presentation host.

use hokusai_core::ResourceHandle;
use hokusai_interface::{
    CharacterSprite, Choice, EndReason, FadeDirection, ScenarioHost, SoundStream, TextLine, Tween,
};
use std::collections::VecDeque;
use std::fmt;
use std::io::{Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Host that writes every presentation call as a line of text.
///
/// Text reveals instantly and fades finish at once. Selections are answered
/// from a queue of scripted picks; when the queue runs dry the first choice
/// is taken.
///
/// # Examples
///
/// ```
/// use hokusai::{ConsoleHost, ScenarioHost, TextLine};
///
/// let mut host = ConsoleHost::new(Vec::new(), vec![1]);
/// let line = TextLine::builder().text("Hello").speaker("Ann").build().unwrap();
/// host.show_text(&line);
/// assert_eq!(String::from_utf8(host.into_inner()).unwrap(), "Ann: Hello\n");
/// ```
#[derive(Debug)]
pub struct ConsoleHost<W = Stdout> {
    out: W,
    started: Instant,
    picks: VecDeque<usize>,
    selected: Option<usize>,
}

impl ConsoleHost<Stdout> {
    /// Host writing to standard output.
    pub fn stdout(picks: Vec<usize>) -> Self {
        Self::new(std::io::stdout(), picks)
    }
}

impl<W: Write> ConsoleHost<W> {
    /// Host writing to `out`, answering selections from `picks` in order.
    pub fn new(out: W, picks: Vec<usize>) -> Self {
        Self {
            out,
            started: Instant::now(),
            picks: picks.into(),
            selected: None,
        }
    }

    /// Scripted picks not used yet.
    pub fn remaining_picks(&self) -> usize {
        self.picks.len()
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", args) {
            warn!(error = %e, "Failed to write output");
        }
    }
}

impl<W: Write> ScenarioHost for ConsoleHost<W> {
    fn set_background(&mut self, texture: &ResourceHandle, _fade: f32) {
        self.line(format_args!("[bg] {}", texture));
    }

    fn clear_background(&mut self, _fade: f32) {
        self.line(format_args!("[bg] off"));
    }

    fn set_event_image(&mut self, texture: &ResourceHandle, _fade: f32) {
        self.line(format_args!("[event] {}", texture));
    }

    fn clear_event_image(&mut self, _fade: f32) {
        self.line(format_args!("[event] off"));
    }

    fn set_sprite(&mut self, name: &str, texture: &ResourceHandle, _fade: f32) {
        self.line(format_args!("[sprite] {} {}", name, texture));
    }

    fn clear_sprite(&mut self, name: Option<&str>, _fade: f32) {
        self.line(format_args!("[sprite] {} off", name.unwrap_or("all")));
    }

    fn show_character(&mut self, sprite: &CharacterSprite) {
        match sprite.pattern() {
            Some(pattern) => self.line(format_args!("[character] {} ({})", sprite.name(), pattern)),
            None => self.line(format_args!("[character] {}", sprite.name())),
        }
    }

    fn hide_character(&mut self, name: Option<&str>, _fade: f32) {
        self.line(format_args!("[character] {} off", name.unwrap_or("all")));
    }

    fn play_sound(&mut self, stream: SoundStream, clip: &ResourceHandle, looping: bool, _fade: f32) {
        if looping {
            self.line(format_args!("[{}] {} (loop)", stream, clip));
        } else {
            self.line(format_args!("[{}] {}", stream, clip));
        }
    }

    fn stop_sound(&mut self, stream: Option<SoundStream>, _fade: f32) {
        match stream {
            Some(stream) => self.line(format_args!("[{}] stop", stream)),
            None => self.line(format_args!("[sound] stop all")),
        }
    }

    fn show_text(&mut self, line: &TextLine) {
        match line.speaker() {
            Some(speaker) => self.line(format_args!("{}: {}", speaker, line.text())),
            None => self.line(format_args!("{}", line.text())),
        }
    }

    fn is_text_display_complete(&self) -> bool {
        true
    }

    fn present_choices(&mut self, choices: &[Choice]) {
        for (index, choice) in choices.iter().enumerate() {
            self.line(format_args!("  {}) {}", index, choice.caption()));
        }
        let pick = self.picks.pop_front().unwrap_or_else(|| {
            warn!(choices = choices.len(), "No scripted pick left, taking the first choice");
            0
        });
        self.line(format_args!("> {}", pick));
        self.selected = Some(pick);
    }

    fn selected_choice(&self) -> Option<usize> {
        self.selected
    }

    fn fade(&mut self, direction: FadeDirection, seconds: f32) {
        self.line(format_args!("[fade {}] {}s", direction, seconds));
    }

    fn play_tween(&mut self, tween: &Tween) {
        self.line(format_args!(
            "[tween] {} {} {}",
            tween.target(),
            tween.animation(),
            tween.arguments()
        ));
    }

    fn send_message(&mut self, name: &str, args: &[String]) {
        self.line(format_args!("[message] {} {}", name, args.join(" ")));
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn on_page_begin(&mut self, label: &str, page: i32) {
        debug!(label, page, "Page begin");
    }

    fn on_page_end(&mut self, label: &str, page: i32) {
        debug!(label, page, "Page end");
        self.selected = None;
    }

    fn on_scenario_end(&mut self, reason: EndReason) {
        self.line(format_args!("[end] {}", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hokusai_core::ResourceKind;

    fn output(host: ConsoleHost<Vec<u8>>) -> String {
        String::from_utf8(host.into_inner()).unwrap()
    }

    #[test]
    fn test_picks_are_used_in_order_then_first() {
        let mut host = ConsoleHost::new(Vec::new(), vec![1]);
        let choices = vec![
            Choice::new("Left", "left", None),
            Choice::new("Right", "right", None),
        ];

        host.present_choices(&choices);
        assert_eq!(host.selected_choice(), Some(1));
        host.on_page_end("intro", 0);
        assert_eq!(host.selected_choice(), None);
        host.present_choices(&choices);
        assert_eq!(host.selected_choice(), Some(0));
        assert_eq!(host.remaining_picks(), 0);
    }

    #[test]
    fn test_presentation_lines() {
        let mut host = ConsoleHost::new(Vec::new(), vec![]);
        let bg = ResourceHandle::new("Texture/BG/room.jpg", ResourceKind::Texture);
        host.set_background(&bg, 0.2);
        host.stop_sound(Some(SoundStream::Bgm), 0.2);
        host.on_scenario_end(EndReason::Completed);

        assert_eq!(
            output(host),
            "[bg] Texture/BG/room.jpg\n[Bgm] stop\n[end] Completed\n"
        );
    }
}
