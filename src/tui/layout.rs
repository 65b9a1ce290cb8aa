use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for one frame.
pub struct AppLayout {
    /// Search field plus profile badge, top row.
    pub header_area: Rect,
    /// Current page: module list, topic body, or resource detail.
    pub page_area: Rect,
    /// Chat panel on the right; zero-width while the chat is closed.
    pub chat_area: Rect,
    /// Toast / key hints, bottom row.
    pub status_area: Rect,
}

impl AppLayout {
    /// Header (3 rows, bordered search field), main area, status bar. The
    /// chat panel takes the right 40% of the main area when open.
    pub fn new(area: Rect, chat_open: bool) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header with search field
                Constraint::Min(3),    // Page content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let (page_area, chat_area) = if chat_open {
            let horizontal_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(vertical_chunks[1]);
            (horizontal_chunks[0], horizontal_chunks[1])
        } else {
            (vertical_chunks[1], Rect::default())
        };

        Self {
            header_area: vertical_chunks[0],
            page_area,
            chat_area,
            status_area: vertical_chunks[2],
        }
    }

    /// Dropdown area for suggestion rows, anchored under the search field
    /// and clipped to the page area. `None` when there is no room.
    pub fn suggestion_area(&self, rows: u16) -> Option<Rect> {
        if rows == 0 || self.page_area.height < 3 {
            return None;
        }
        // borders take two rows
        let height = (rows + 2).min(self.page_area.height);
        let width = (self.header_area.width * 2 / 3).max(20).min(self.page_area.width);
        Some(Rect::new(self.page_area.x, self.page_area.y, width, height))
    }

    /// Centered modal box for quiz results, level-up, and rating overlays.
    pub fn modal_area(&self, width: u16, height: u16) -> Rect {
        let width = width.min(self.page_area.width);
        let height = height.min(self.page_area.height);
        let x = self.page_area.x + (self.page_area.width - width) / 2;
        let y = self.page_area.y + (self.page_area.height - height) / 2;
        Rect::new(x, y, width, height)
    }
}
