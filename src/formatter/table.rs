//! Table formatting for registry listings using tabled

use tabled::{
    Table,
    builder::Builder,
    settings::{Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::registry::Root;

/// Maximum width for a description column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 60;

/// Table formatter for the actions of a registry tree
pub struct TableFormatter {
    /// Maximum description column width
    max_column_width: usize,

    /// Enable colored output
    use_colors: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    pub fn new(use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            use_colors,
        }
    }

    /// Format every action of the tree, one row each, in tree order
    ///
    /// # Arguments
    /// * `root` - Registry tree
    ///
    /// # Returns
    /// * `String` - Table string, or a placeholder for an empty tree
    pub fn format_actions(&self, root: &Root) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Spec", "Target", "Action"]);

        let mut rows = 0;
        for (path, target, action) in root.actions() {
            builder.push_record([
                path,
                target.description().to_string(),
                action.description().to_string(),
            ]);
            rows += 1;
        }

        if rows == 0 {
            return "(no actions found)".to_string();
        }

        let mut table = builder.build();
        self.apply_style(&mut table);
        table.to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        table.with(Style::psql());
        table.with(Modify::new(Columns::new(1..)).with(Width::wrap(self.max_column_width)));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
            table.modify(Columns::first(), Color::FG_BLUE);
        }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}
