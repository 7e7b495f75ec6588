use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::Local;
use unicode_width::UnicodeWidthStr;

use crate::app::ViewModel;
use crate::config::Config;
use crate::task::Task;
use crate::view::ViewControls;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    /// Renders the visible page as a table, with a footer line showing
    /// where the page sits and what controls produced it, and a banner
    /// for the open edit session if any.
    #[tracing::instrument(skip(self, vm, controls))]
    pub fn print_view(&mut self, vm: &ViewModel, controls: &ViewControls) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if vm.visible.tasks.is_empty() {
            writeln!(out, "No tasks on this page.")?;
        } else {
            let headers = vec![
                "ID".to_string(),
                "Status".to_string(),
                "Description".to_string(),
                "Modified".to_string(),
            ];

            let rows = vm
                .visible
                .tasks
                .iter()
                .map(|task| self.task_row(task))
                .collect();

            write_table(&mut out, headers, rows)?;
        }

        writeln!(
            out,
            "Page {}/{} (sort: {}, filter: {})",
            vm.visible.page,
            vm.visible.total_pages,
            controls.sort_field.label(),
            controls.filter.label()
        )?;

        if let Some(draft) = &vm.edit {
            writeln!(
                out,
                "Editing task {}: \"{}\" [{}]  (save | cancel)",
                draft.target_id, draft.description, draft.status
            )?;
        }

        Ok(())
    }

    fn task_row(&self, task: &Task) -> Vec<String> {
        let id = self.paint(&task.id.to_string(), "1");
        let status = self.paint(task.status.label(), task.status.color_code());
        let modified = task
            .modified
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        vec![id, status, task.description.clone(), modified]
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{strip_ansi, write_table};

    #[test]
    fn table_columns_align_on_visible_width() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            vec!["ID".to_string(), "Description".to_string()],
            vec![
                vec!["1".to_string(), "short".to_string()],
                vec!["12".to_string(), "a longer description".to_string()],
            ],
        )
        .expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ID "));
        assert!(lines[1].starts_with("-- "));
        assert!(lines[2].starts_with("1  "));
        assert!(lines[3].starts_with("12 "));
    }

    #[test]
    fn strip_ansi_removes_color_codes() {
        assert_eq!(strip_ansi("\x1b[31mNot Started\x1b[0m"), "Not Started");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
