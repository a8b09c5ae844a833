use std::io;

use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
    Terminal,
};
use unicode_width::UnicodeWidthStr;

use typing_arcade::games::Playfield;
use typing_arcade::scene::{Actor, ActorKind, Renderer, Scene, TargetView};

const HORIZONTAL_MARGIN: u16 = 2;
const HELP: &str = "esc quit · tab restart";

/// Draws scenes to a ratatui terminal. Draw errors are held until the event
/// loop collects them.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    error: Option<io::Error>,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            error: None,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, scene: &Scene) {
        if let Err(e) = self.terminal.draw(|f| f.render_widget(SceneView(scene), f.area())) {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }
}

pub struct SceneView<'a>(pub &'a Scene);

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scene = self.0;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .horizontal_margin(HORIZONTAL_MARGIN)
        .split(area);

        Paragraph::new(status_line(scene))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let block = Block::bordered().title(Span::styled(format!(" {} ", scene.title), bold_style));
        let field = block.inner(chunks[1]);
        block.render(chunks[1], buf);

        if scene.metrics.is_some() {
            render_practice(scene, field, buf);
        } else {
            for actor in &scene.actors {
                render_actor(actor, scene.playfield, field, buf);
            }
            for target in &scene.targets {
                render_target(target, scene.playfield, field, buf);
            }
        }

        if let Some(banner) = &scene.banner {
            render_banner(banner, field, buf);
        }

        Paragraph::new(Span::styled(HELP, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }
}

fn status_line(scene: &Scene) -> Line<'static> {
    let dim_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM);

    let text = if let Some(metrics) = &scene.metrics {
        format!(
            "{}   wpm {}   acc {}%   {}%",
            metrics.clock(),
            metrics.wpm,
            metrics.accuracy,
            metrics.progress
        )
    } else if let Some(state) = &scene.session {
        let mut line = format!(
            "score {}   level {}   lives {}",
            state.score, state.level, state.lives
        );
        if let Some(readout) = &scene.readout {
            line.push_str("   ");
            line.push_str(readout);
        }
        line
    } else {
        String::new()
    };
    Line::from(Span::styled(text, dim_bold_style))
}

fn render_practice(scene: &Scene, area: Rect, buf: &mut Buffer) {
    let Some(target) = scene.targets.first() else {
        return;
    };
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let chars: Vec<char> = target.text.chars().collect();
    let typed: String = chars[..target.typed.min(chars.len())].iter().collect();
    let mut spans = vec![Span::styled(typed, green_bold_style)];
    if let Some(pending) = chars.get(target.typed) {
        spans.push(Span::styled(pending.to_string(), underlined_dim_bold_style));
        let rest: String = chars[target.typed + 1..].iter().collect();
        spans.push(Span::styled(rest, dim_bold_style));
    }

    let width = area.width.max(1) as usize;
    let lines = (target.text.width() / width + 1) as u16;
    let top = area.y + area.height.saturating_sub(lines) / 2;
    let text_area = Rect::new(area.x, top, area.width, lines.min(area.height));

    Paragraph::new(Line::from(spans))
        .alignment(if target.text.width() <= width {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(text_area, buf);
}

/// Maps a playfield position to a terminal cell inside `area`
fn project(playfield: Playfield, area: Rect, x: f64, y: f64) -> Option<(u16, u16)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if x < 0.0 || y < 0.0 || x > playfield.width || y > playfield.height {
        return None;
    }
    let col = ((x / playfield.width) * area.width as f64) as u16;
    let row = ((y / playfield.height) * area.height as f64) as u16;
    Some((
        area.x + col.min(area.width - 1),
        area.y + row.min(area.height - 1),
    ))
}

/// Places a line centred on `col`, clipped to `area`
fn put_centred(line: &Line, width: usize, col: u16, row: u16, area: Rect, buf: &mut Buffer) {
    let half = (width / 2) as u16;
    let x = col.saturating_sub(half).max(area.x);
    let room = (area.x + area.width).saturating_sub(x);
    buf.set_line(x, row, line, room);
}

fn render_target(target: &TargetView, playfield: Playfield, area: Rect, buf: &mut Buffer) {
    let Some((col, row)) = project(playfield, area, target.x, target.y) else {
        return;
    };
    let typed_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let rest_style = if target.active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let split = target
        .text
        .char_indices()
        .nth(target.typed)
        .map_or(target.text.len(), |(idx, _)| idx);
    let line = Line::from(vec![
        Span::styled(&target.text[..split], typed_style),
        Span::styled(&target.text[split..], rest_style),
    ]);
    put_centred(&line, target.text.width(), col, row, area, buf);
}

fn render_actor(actor: &Actor, playfield: Playfield, area: Rect, buf: &mut Buffer) {
    let Some((col, row)) = project(playfield, area, actor.x, actor.y) else {
        return;
    };
    let (glyph, color) = match actor.kind {
        ActorKind::Cannon => ("/^\\", Color::Cyan),
        ActorKind::Police => ("[P]", Color::Blue),
        ActorKind::Thief => ("[T]", Color::Red),
        ActorKind::Basket => ("\\_/", Color::Yellow),
        ActorKind::Frog => ("@", Color::Green),
    };
    let line = Line::from(Span::styled(glyph, Style::default().fg(color)));
    put_centred(&line, glyph.width(), col, row, area, buf);
}

fn render_banner(banner: &str, area: Rect, buf: &mut Buffer) {
    let width = (banner.width() as u16 + 4).min(area.width);
    let height = area.height.min(3);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    Clear.render(rect, buf);
    Paragraph::new(Span::styled(
        banner.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .block(Block::bordered())
    .render(rect, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use typing_arcade::metrics::MetricsSnapshot;
    use typing_arcade::session::SessionState;

    fn draw(scene: &Scene) -> String {
        let backend = TestBackend::new(80, 24);
        let mut renderer = TerminalRenderer::new(Terminal::new(backend).unwrap());
        renderer.render(scene);
        renderer.take_error().unwrap();

        let buffer = renderer.terminal_mut().backend().buffer().clone();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn target(text: &str, typed: usize, x: f64, y: f64) -> TargetView {
        TargetView {
            text: text.to_string(),
            typed,
            x,
            y,
            active: typed > 0,
        }
    }

    #[test]
    fn test_practice_scene_shows_text_and_metrics() {
        let mut scene = Scene::new("Practice", Playfield::default());
        scene.targets.push(target("the quick brown fox", 4, 0.0, 0.0));
        scene.metrics = Some(MetricsSnapshot {
            elapsed_ms: 65_000,
            wpm: 41,
            accuracy: 96,
            progress: 21,
        });

        let content = draw(&scene);
        assert!(content.contains("the quick brown fox"));
        assert!(content.contains("01:05"));
        assert!(content.contains("wpm 41"));
        assert!(content.contains("Practice"));
    }

    #[test]
    fn test_game_scene_places_words_and_actors() {
        let mut scene = Scene::new("Space War", Playfield::default());
        scene.session = Some(SessionState::new());
        scene.targets.push(target("tiger", 2, 400.0, 300.0));
        scene.targets.push(target("hidden", 0, 400.0, -20.0));
        scene.actors.push(Actor {
            kind: ActorKind::Cannon,
            x: 400.0,
            y: 600.0,
        });

        let content = draw(&scene);
        assert!(content.contains("tiger"));
        assert!(!content.contains("hidden"));
        assert!(content.contains("/^\\"));
        assert!(content.contains("lives 3"));
    }

    #[test]
    fn test_banner_is_drawn() {
        let mut scene = Scene::new("Police vs Thief", Playfield::default());
        scene.session = Some(SessionState::new());
        scene.banner = Some("The thief got away!".to_string());

        assert!(draw(&scene).contains("The thief got away!"));
    }

    #[test]
    fn test_readout_joins_status_line() {
        let mut scene = Scene::new("Police vs Thief", Playfield::default());
        scene.session = Some(SessionState::new());
        scene.readout = Some("Distance: 250m".to_string());

        let content = draw(&scene);
        assert!(content.contains("lives 3   Distance: 250m"));
    }

    #[test]
    fn test_project_bounds() {
        let area = Rect::new(1, 1, 80, 20);
        let playfield = Playfield::default();
        assert_eq!(project(playfield, area, 0.0, 0.0), Some((1, 1)));
        assert_eq!(project(playfield, area, 800.0, 600.0), Some((80, 20)));
        assert_eq!(project(playfield, area, 10.0, -1.0), None);
        assert_eq!(project(playfield, area, 801.0, 10.0), None);
    }
}
