use tabled::{
    Table, Tabled,
    settings::{Panel, Remove, Style, object::Rows},
};

/// Blank-style table rendering for command output.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub title: Option<String>,
    pub footer: Option<String>,
    /// Drop the derived column-name row.
    pub headerless: bool,
}

impl TableView {
    pub fn render<T: Tabled, I: IntoIterator<Item = T>>(self, rows: I) -> Table {
        let mut table = Table::new(rows);

        if self.headerless {
            table.with(Remove::row(Rows::first()));
        }
        if let Some(title) = self.title {
            table.with(Panel::header(title));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}
