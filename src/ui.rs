use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use crate::finder::Finder;
use crate::listing::{DirectoryEntry, Listing};
use crate::preview::Preview;
use crate::theme::{get_theme, Theme};

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = get_theme();
    let background = Block::default().style(Style::default().bg(theme.background));
    frame.render_widget(background, frame.area());

    match (app.mode, app.finder.as_ref()) {
        (Mode::Finder, Some(finder)) => draw_finder(frame, app, finder, &theme),
        _ => draw_explorer(frame, app, &theme),
    }
}

fn draw_explorer(frame: &mut Frame, app: &App, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(40),
            Constraint::Percentage(40),
        ])
        .split(rows[1]);

    draw_header(frame, app, rows[0], theme);

    let parent_selected = Style::default()
        .bg(theme.parent_selected_bg)
        .fg(theme.text_default);
    draw_listing(frame, app.explorer.parent(), panes[0], parent_selected, None, theme);

    let selected = Style::default()
        .bg(theme.selected_bg)
        .fg(theme.selected_fg)
        .add_modifier(Modifier::BOLD);
    draw_listing(
        frame,
        app.explorer.current(),
        panes[1],
        selected,
        app.highlight_term(),
        theme,
    );

    draw_preview(frame, app.explorer.preview(), panes[2], theme);
    draw_footer(frame, app, rows[2], theme);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(
            " Explore ",
            Style::default()
                .fg(theme.header_title)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let mut spans = vec![Span::styled(
        app.explorer.current_path().display().to_string(),
        Style::default().fg(theme.header_path),
    )];
    if app.explorer.show_hidden() {
        spans.push(Span::styled(
            "  [hidden]",
            Style::default().fg(theme.preview_placeholder),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_listing(
    frame: &mut Frame,
    listing: &Listing,
    area: Rect,
    selected_style: Style,
    highlight: Option<&str>,
    theme: &Theme,
) {
    let items: Vec<ListItem> = listing
        .entries()
        .iter()
        .map(|entry| {
            let text = entry.display_text();
            let mask = match highlight {
                Some(term) => occurrence_mask(&text, term),
                None => Vec::new(),
            };
            let hit = Style::default()
                .fg(theme.search_match)
                .add_modifier(Modifier::BOLD);
            ListItem::new(Line::from(styled_spans(
                &text,
                &mask,
                entry_style(entry, theme),
                hit,
            )))
        })
        .collect();

    let list = List::new(items).highlight_style(selected_style);
    let mut state = ListState::default();
    if !listing.is_empty() {
        state.select(Some(listing.selected()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn entry_style(entry: &DirectoryEntry, theme: &Theme) -> Style {
    if entry.is_marked {
        Style::default().fg(theme.marked)
    } else if entry.is_dir {
        Style::default()
            .fg(theme.directory)
            .add_modifier(Modifier::BOLD)
    } else if entry.is_executable {
        Style::default().fg(theme.executable)
    } else {
        Style::default().fg(theme.text_default)
    }
}

fn draw_preview(frame: &mut Frame, preview: &Preview, area: Rect, theme: &Theme) {
    let placeholder = |text: String| {
        Paragraph::new(text).style(Style::default().fg(theme.preview_placeholder))
    };

    match preview {
        Preview::Listing(listing) => {
            let selected = Style::default()
                .bg(theme.parent_selected_bg)
                .fg(theme.text_default);
            draw_listing(frame, listing, area, selected, None, theme);
        }
        Preview::Text(lines) => frame.render_widget(Paragraph::new(lines.clone()), area),
        Preview::Binary => frame.render_widget(placeholder("binary file".to_string()), area),
        Preview::Empty => frame.render_widget(placeholder("empty".to_string()), area),
        Preview::Unavailable(reason) => frame.render_widget(placeholder(reason.clone()), area),
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let line = match &app.prompt {
        Some(prompt) => Line::from(Span::styled(
            format!("{}{}", prompt.prefix(), prompt.text()),
            Style::default().fg(theme.prompt),
        )),
        None => {
            let mut spans = vec![Span::styled(
                app.status_message.clone(),
                Style::default().fg(theme.status_bar_fg),
            )];
            let marked = app.explorer.marked().len();
            if marked > 0 {
                spans.push(Span::raw(" | "));
                spans.push(Span::styled(
                    format!("{} marked", marked),
                    Style::default().fg(theme.marked),
                ));
            }
            if app.chord.is_pending() {
                spans.push(Span::raw(" | "));
                spans.push(Span::styled(
                    app.chord.buffer().to_string(),
                    Style::default().fg(theme.chord),
                ));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(theme.status_bar_bg));
    frame.render_widget(paragraph, area);
}

fn draw_finder(frame: &mut Frame, app: &App, finder: &Finder, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let block = Block::default()
        .title(format!(
            " Find ({}/{}) ",
            finder.results().len(),
            finder.candidate_count()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let hit = Style::default()
        .fg(theme.fuzzy_match)
        .add_modifier(Modifier::BOLD);
    let items: Vec<ListItem> = finder
        .results()
        .iter()
        .map(|result| {
            let base = match finder.entry(result) {
                Some(entry) => entry_style(entry, theme),
                None => Style::default().fg(theme.text_default),
            };
            let mut mask = vec![false; result.name.chars().count()];
            for &position in &result.positions {
                if let Some(slot) = mask.get_mut(position) {
                    *slot = true;
                }
            }
            ListItem::new(Line::from(styled_spans(&result.name, &mask, base, hit)))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(theme.parent_selected_bg)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default();
    if !finder.results().is_empty() {
        state.select(Some(finder.selected()));
    }
    frame.render_stateful_widget(list, panes[0], &mut state);

    let preview_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = preview_block.inner(panes[1]);
    frame.render_widget(preview_block, panes[1]);
    draw_preview(frame, finder.preview(), inner, theme);

    let footer = Line::from(vec![
        Span::styled(
            format!("/{}", finder.query()),
            Style::default().fg(theme.prompt),
        ),
        Span::raw(" | "),
        Span::styled(
            app.status_message.clone(),
            Style::default().fg(theme.status_bar_fg),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(theme.status_bar_bg)),
        rows[1],
    );
}

/// Characters of `text` covered by a case-insensitive occurrence of `term`.
pub fn occurrence_mask(text: &str, term: &str) -> Vec<bool> {
    let haystack: Vec<char> = text.chars().map(fold_case).collect();
    let needle: Vec<char> = term.chars().map(fold_case).collect();
    let mut mask = vec![false; haystack.len()];
    if needle.is_empty() {
        return mask;
    }

    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()] == needle[..] {
            mask[start..start + needle.len()].fill(true);
            start += needle.len();
        } else {
            start += 1;
        }
    }
    mask
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Split `text` into runs, using `hit` where `mask` is set.
fn styled_spans(text: &str, mask: &[bool], base: Style, hit: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_hit = false;

    for (i, c) in text.chars().enumerate() {
        let is_hit = mask.get(i).copied().unwrap_or(false);
        if is_hit != run_hit && !run.is_empty() {
            let style = if run_hit { hit } else { base };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_hit = is_hit;
        run.push(c);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, if run_hit { hit } else { base }));
    }
    spans
}
