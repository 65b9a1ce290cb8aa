use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{MessageType, Overlay, Toast};
use super::events::Zone;
use super::layout::AppLayout;
use crate::api::types::{Profile, ResourceSummary, TopicDetail};
use crate::assistant::ChatFeed;
use crate::assistant::conversation::Speaker;
use crate::search::SuggestionPanel;
use crate::study::bookmarks::BookmarkBadge;
use crate::study::calculator::CalculatorForm;
use crate::study::quiz::QuizSheet;
use crate::study::rating::StarRating;
use crate::study::topics::ModuleNav;

const EMERALD: Color = Color::Rgb(16, 185, 129);
const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const DARK: Color = Color::Rgb(24, 24, 27);
const RED: Color = Color::Rgb(239, 68, 68);
const AMBER: Color = Color::Rgb(245, 158, 11);

/// Content of the main area for one frame.
pub enum PageState<'a> {
    Modules {
        nav: &'a ModuleNav,
    },
    Topic {
        topic: &'a TopicDetail,
        scroll: usize,
        resources: &'a [ResourceSummary],
        resource_cursor: usize,
    },
    Resource {
        resource: &'a ResourceSummary,
        bookmark: &'a BookmarkBadge,
    },
    Loading {
        path: String,
    },
}

/// Immutable snapshot of everything a frame draws from.
pub struct RenderState<'a> {
    pub search_query: &'a str,
    pub searching: bool,
    pub mic_active: bool,
    pub panel: &'a SuggestionPanel,
    pub profile: Option<&'a Profile>,
    pub level: u32,
    pub page: PageState<'a>,
    pub feed: &'a ChatFeed,
    pub quick_reply_cursor: usize,
    pub overlay: Option<&'a Overlay>,
    pub rating: &'a StarRating,
    pub toast: Option<&'a Toast>,
    pub zone: Zone,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.feed.open);

    render_header(frame, layout.header_area, state);
    render_page(frame, layout.page_area, state);
    if state.feed.open {
        render_chat(frame, layout.chat_area, state);
    }
    render_status_bar(frame, layout.status_area, state);

    // dropdown and modals paint over the page
    if state.panel.is_visible()
        && let Some(area) = layout.suggestion_area(state.panel.items().len() as u16)
    {
        render_suggestions(frame, area, state.panel);
    }
    if let Some(overlay) = state.overlay {
        render_overlay(frame, &layout, overlay, state.rating);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &RenderState) {
    let cursor = if state.searching { "█" } else { "" };
    let mic = if state.mic_active { " 🎤" } else { "" };
    let profile = match state.profile {
        Some(p) => format!(" {} · Level {} · {} pts ", p.username, state.level, p.total_points),
        None => format!(" Level {} ", state.level),
    };

    let search_style = if state.searching {
        Style::default().fg(BRIGHT)
    } else {
        Style::default().fg(MUTED)
    };
    let line = Line::from(vec![
        Span::styled(format!("🔍 {}{}{}", state.search_query, cursor, mic), search_style),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if state.searching { EMERALD } else { MUTED }))
        .title(" MediCore Desk ")
        .title_bottom(Line::from(Span::styled(profile, Style::default().fg(MUTED))).right_aligned());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_page(frame: &mut Frame, area: Rect, state: &RenderState) {
    match &state.page {
        PageState::Modules { nav } => render_modules(frame, area, nav),
        PageState::Topic { topic, scroll, resources, resource_cursor } => {
            render_topic(frame, area, topic, *scroll, resources, *resource_cursor);
        }
        PageState::Resource { resource, bookmark } => {
            render_resource(frame, area, resource, bookmark);
        }
        PageState::Loading { path } => {
            let paragraph = Paragraph::new(format!("Loading {path} …"))
                .style(Style::default().fg(MUTED))
                .block(Block::default().borders(Borders::ALL).title(" MediCore "));
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_modules(frame: &mut Frame, area: Rect, nav: &ModuleNav) {
    let mut items: Vec<ListItem> = Vec::new();
    let topics_open = nav.expanded_topics().is_some();

    for (idx, module) in nav.modules().iter().enumerate() {
        let expanded = nav.expanded_module() == Some(module.id);
        let arrow = if expanded { "▼" } else { "▶" };
        let count = module
            .topic_count
            .map(|n| format!(" ({n} topics)"))
            .unwrap_or_default();
        let style = if idx == nav.cursor() && !topics_open {
            Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(BRIGHT)
        };
        items.push(ListItem::new(format!("{arrow} {}{count}", module.name)).style(style));

        if expanded {
            match nav.expanded_topics() {
                Some(topics) => {
                    for (t_idx, topic) in topics.iter().enumerate() {
                        let mark = if topic.completed { "✓" } else { "○" };
                        let progress = topic
                            .progress_percentage
                            .filter(|p| *p > 0)
                            .map(|p| format!(" {p}%"))
                            .unwrap_or_default();
                        let style = if t_idx == nav.topic_cursor() {
                            Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(MUTED)
                        };
                        items.push(
                            ListItem::new(format!("   {mark} {}{progress}", topic.title))
                                .style(style),
                        );
                    }
                }
                None => {
                    items.push(
                        ListItem::new("   loading …").style(Style::default().fg(MUTED)),
                    );
                }
            }
        }
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(" Course Modules "),
    );
    frame.render_widget(list, area);
}

fn render_topic(
    frame: &mut Frame,
    area: Rect,
    topic: &TopicDetail,
    scroll: usize,
    resources: &[ResourceSummary],
    resource_cursor: usize,
) {
    let resource_rows = (resources.len() as u16).min(5);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(resource_rows + 2)])
        .split(area);

    let module = topic.module_name.as_deref().unwrap_or("Course");
    let progress = if topic.completed {
        "✓ completed".to_string()
    } else {
        format!("{}%", topic.progress_percentage)
    };
    let quiz_hint = if topic.quiz.is_some() { " · q: quiz" } else { "" };
    let title = format!(" {module} › {} — {progress}{quiz_hint} ", topic.title);

    let paragraph = Paragraph::new(topic.content.as_str())
        .style(Style::default().fg(BRIGHT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, chunks[0]);

    let items: Vec<ListItem> = resources
        .iter()
        .enumerate()
        .map(|(idx, resource)| {
            let kind = resource.resource_type.as_deref().unwrap_or("resource");
            let style = if idx == resource_cursor {
                Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED)
            };
            ListItem::new(format!("[{kind}] {}", resource.title)).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(" Library Resources "),
    );
    frame.render_widget(list, chunks[1]);
}

fn render_resource(frame: &mut Frame, area: Rect, resource: &ResourceSummary, bookmark: &BookmarkBadge) {
    let stars = match (resource.average_rating, resource.rating_count) {
        (Some(avg), Some(count)) => format!("{avg:.1} ★ ({count} ratings)"),
        (Some(avg), None) => format!("{avg:.1} ★"),
        _ => "not yet rated".to_string(),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Author: ", Style::default().fg(MUTED)),
            Span::raw(resource.author.as_deref().unwrap_or("unknown")),
        ]),
        Line::from(vec![
            Span::styled("Type: ", Style::default().fg(MUTED)),
            Span::raw(resource.resource_type.as_deref().unwrap_or("resource")),
            Span::styled(
                resource
                    .year_published
                    .map(|y| format!("  ({y})"))
                    .unwrap_or_default(),
                Style::default().fg(MUTED),
            ),
        ]),
        Line::from(vec![
            Span::styled("Rating: ", Style::default().fg(MUTED)),
            Span::styled(stars, Style::default().fg(AMBER)),
        ]),
        Line::from(""),
    ];
    if let Some(description) = &resource.description {
        for line in description.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "b: bookmark · r: rate · s: summarize",
        Style::default().fg(MUTED),
    )));

    let title = format!(" {} {} ", bookmark.icon(), resource.title);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_chat(frame: &mut Frame, area: Rect, state: &RenderState) {
    let quick_rows = (state.feed.quick_replies().len() as u16).min(4);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(quick_rows),
            Constraint::Length(3),
        ])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for bubble in state.feed.bubbles() {
        let (label, style) = match bubble.speaker {
            Speaker::User => ("You", Style::default().fg(EMERALD).add_modifier(Modifier::BOLD)),
            Speaker::Assistant => ("AI", Style::default().fg(AMBER).add_modifier(Modifier::BOLD)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label} "), style),
            Span::styled(bubble.timestamp.format("%H:%M").to_string(), Style::default().fg(MUTED)),
        ]));
        for text_line in bubble.text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::from(""));
    }
    if state.feed.is_awaiting_reply() {
        lines.push(Line::from(Span::styled("AI is typing …", Style::default().fg(MUTED))));
    }

    // keep the latest bubbles in view
    let inner_height = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(inner_height) as u16;

    let feed = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(" Study Assistant "),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(feed, chunks[0]);

    if quick_rows > 0 {
        let items: Vec<ListItem> = state
            .feed
            .quick_replies()
            .iter()
            .enumerate()
            .map(|(idx, reply)| {
                let style = if idx == state.quick_reply_cursor {
                    Style::default().fg(BRIGHT).bg(EMERALD)
                } else {
                    Style::default().fg(MUTED)
                };
                ListItem::new(format!("↳ {reply}")).style(style)
            })
            .collect();
        frame.render_widget(List::new(items), chunks[1]);
    }

    let cursor = if state.zone == Zone::Chat { "█" } else { "" };
    let composer = Paragraph::new(format!("{}{}", state.feed.composer, cursor)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if state.zone == Zone::Chat { EMERALD } else { MUTED }))
            .title(" Message "),
    );
    frame.render_widget(composer, chunks[2]);
}

fn render_suggestions(frame: &mut Frame, area: Rect, panel: &SuggestionPanel) {
    let items: Vec<ListItem> = panel
        .items()
        .iter()
        .enumerate()
        .map(|(idx, suggestion)| {
            let style = if idx == panel.selected_index() {
                Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(BRIGHT)
            };
            ListItem::new(format!("[{}] {}", suggestion.kind, suggestion.text)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(EMERALD))
            .title(" Suggestions "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

fn render_overlay(frame: &mut Frame, layout: &AppLayout, overlay: &Overlay, rating: &StarRating) {
    match overlay {
        Overlay::Quiz(sheet) => render_quiz(frame, layout.modal_area(64, 18), sheet),
        Overlay::QuizResults(results) => {
            let area = layout.modal_area(48, 10);
            let passed = results.passed.unwrap_or(false);
            let (verdict, color) = if passed { ("Passed! 🎉", EMERALD) } else { ("Not passed", RED) };
            let mut lines = vec![
                Line::from(Span::styled(verdict, Style::default().fg(color).add_modifier(Modifier::BOLD))),
                Line::from(""),
            ];
            if let Some(score) = results.score {
                lines.push(Line::from(format!("Score: {score:.0}%")));
            }
            if let (Some(correct), Some(total)) = (results.correct_answers, results.total_questions) {
                lines.push(Line::from(format!("{correct} of {total} correct")));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Enter to close", Style::default().fg(MUTED))));
            render_modal(frame, area, " Quiz Results ", lines);
        }
        Overlay::LevelUp(level) => {
            let area = layout.modal_area(40, 7);
            let lines = vec![
                Line::from(Span::styled(
                    "🎉 Level Up!",
                    Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("You reached Level {level}")),
                Line::from(Span::styled("Enter to close", Style::default().fg(MUTED))),
            ];
            render_modal(frame, area, " Congratulations ", lines);
        }
        Overlay::Calculator(form) => render_calculator(frame, layout.modal_area(54, 16), form),
        Overlay::Rating => {
            let area = layout.modal_area(50, 9);
            let lines = vec![
                Line::from(Span::styled(rating.row(), Style::default().fg(AMBER))),
                Line::from(Span::styled("↑/↓ select stars", Style::default().fg(MUTED))),
                Line::from(""),
                Line::from(format!("Comment: {}█", rating.comment)),
                Line::from(""),
                Line::from(Span::styled("Enter: submit · Esc: cancel", Style::default().fg(MUTED))),
            ];
            render_modal(frame, area, " Rate this resource ", lines);
        }
    }
}

fn render_quiz(frame: &mut Frame, area: Rect, sheet: &QuizSheet) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(question) = sheet.questions().get(sheet.cursor()) {
        lines.push(Line::from(Span::styled(
            format!("Question {} of {}", sheet.cursor() + 1, sheet.questions().len()),
            Style::default().fg(MUTED),
        )));
        lines.push(Line::from(question.prompt.clone()));
        lines.push(Line::from(""));
        let selected = sheet.selection_for(question.id);
        for (idx, option) in question.options.iter().enumerate() {
            let marker = if selected == Some(option.value.as_str()) { "●" } else { "○" };
            let style = if selected == Some(option.value.as_str()) {
                Style::default().fg(EMERALD)
            } else {
                Style::default().fg(BRIGHT)
            };
            lines.push(Line::from(Span::styled(
                format!("  {marker} {}. {}", idx + 1, option.label),
                style,
            )));
        }
    } else {
        lines.push(Line::from("This quiz has no questions."));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "{}/{} answered · 1-9: pick · ↑/↓: question · Enter: submit · Esc: cancel",
            sheet.answered_count(),
            sheet.questions().len()
        ),
        Style::default().fg(MUTED),
    )));

    render_modal(frame, area, &format!(" {} ", sheet.title()), lines);
}

fn render_calculator(frame: &mut Frame, area: Rect, form: &CalculatorForm) {
    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in form.fields().iter().enumerate() {
        let active = idx == form.cursor();
        let cursor = if active { "█" } else { "" };
        let style = if active {
            Style::default().fg(EMERALD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(BRIGHT)
        };
        lines.push(Line::from(Span::styled(
            format!("{}: {}{cursor}", field.label, field.value),
            style,
        )));
    }

    if !form.result().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Result:",
            Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        )));
        for (key, value) in form.result() {
            lines.push(Line::from(format!("  {key}: {value}")));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab: switch · ↑/↓: field · Enter: calculate · Esc: close",
        Style::default().fg(MUTED),
    )));

    render_modal(frame, area, &format!(" {} ", form.kind().title()), lines);
}

fn render_modal(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let paragraph = Paragraph::new(Text::from(lines))
        .style(Style::default().fg(BRIGHT).bg(DARK))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(EMERALD))
                .title(title.to_string()),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (status_text, style) = if let Some(toast) = state.toast {
        let color = match toast.message_type {
            MessageType::Success => EMERALD,
            MessageType::Error => RED,
        };
        (format!(" {} ", toast.text), Style::default().fg(color).bg(DARK))
    } else {
        let hints = match state.zone {
            Zone::Browse => {
                " /: search | c: chat | ↑/↓: move | Enter: open | Esc: back | Ctrl+C: quit "
            }
            Zone::Search => " type to search | ↑/↓: pick | Enter: open | Ctrl+V: voice | Esc: close ",
            Zone::Chat => {
                " Enter: send | Ctrl+Y: copy | Ctrl+G/B: feedback | Ctrl+V: voice | Esc: close "
            }
            Zone::Quiz => " 1-9: answer | ↑/↓: question | Enter: submit | Esc: cancel ",
            Zone::Rating => " ↑/↓: stars | type: comment | Enter: submit | Esc: cancel ",
            Zone::Calculator => {
                " type: value | ↑/↓: field | Tab: switch | Enter: calculate | Esc: close "
            }
            Zone::Modal => " Enter: close ",
        };
        (hints.to_string(), Style::default().fg(BRIGHT).bg(DARK))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}
