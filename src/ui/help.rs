use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

// Help section structure
pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

// Help section definitions
pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation:",
        items: &[
            ("j/↓", "Select next row"),
            ("k/↑", "Select previous row"),
            ("h/←", "Select parent"),
            ("g  ", "Go to top"),
            ("G  ", "Go to bottom"),
        ],
    },
    HelpSection {
        title: "Structure:",
        items: &[
            ("J/K", "Move down/up among siblings"),
            ("⇥/>", "Indent under previous sibling"),
            ("⇤/<", "Outdent one level"),
            ("P  ", "Add page"),
            ("a  ", "Add section"),
            ("1-9", "Add module (text, gallery, article, news, timeline, newsletter, form, cta, list)"),
            ("d  ", "Delete with children"),
            ("␣/v", "Toggle visibility"),
            ("e/⏎", "Rename"),
        ],
    },
    HelpSection {
        title: "Mouse:",
        items: &[
            ("drag        ", "Reorder; move right to nest, left to outdent"),
            ("Esc         ", "Cancel the drag in progress"),
        ],
    },
    HelpSection {
        title: "File:",
        items: &[
            ("s  ", "Save"),
            ("u  ", "Undo"),
            ("^r ", "Redo"),
            ("q  ", "Quit"),
            ("Q  ", "Quit without saving"),
        ],
    },
];

// Help renderer
pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(Self::build_help_text())
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_help_text() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "pagetree Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for section in SECTIONS {
            lines.push(Line::from(vec![Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )]));

            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press ESC or q to close help"));
        lines
    }
}
