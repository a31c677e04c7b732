use crate::api::ApiError;
use crate::api::analytics::MatrixQuery;
use crate::api::types::{ContractMatrix, GroupMatrix, SummaryMatrix};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixCell<'a> {
    pub date: &'a str,
    pub connected: u64,
    pub disconnected: u64,
    /// `None` when the contract had no sampled vehicles that day.
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatrixRow<'a> {
    /// Column labels, one per date.
    Header { dates: &'a [String] },
    /// Group label spanning the table; not selectable.
    Section { group: &'a str },
    Contract {
        name: &'a str,
        cells: Vec<MatrixCell<'a>>,
    },
}

impl MatrixRow<'_> {
    pub fn is_selectable(&self) -> bool {
        matches!(self, MatrixRow::Contract { .. })
    }
}

/// Borrowing view over a loaded matrix. Never mutates the response.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    data: &'a SummaryMatrix,
}

impl<'a> MatrixView<'a> {
    pub fn new(data: &'a SummaryMatrix) -> Self {
        Self { data }
    }

    pub fn dates(&self) -> &'a [String] {
        &self.data.dates
    }

    /// Lazily yields header, then for each group a section row followed by its
    /// contract rows. Call again to start over.
    pub fn rows(&self) -> MatrixRows<'a> {
        MatrixRows {
            data: self.data,
            header_done: false,
            group: 0,
            contract: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatrixRows<'a> {
    data: &'a SummaryMatrix,
    header_done: bool,
    group: usize,
    // None: the current group's section row is next.
    contract: Option<usize>,
}

impl<'a> Iterator for MatrixRows<'a> {
    type Item = MatrixRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.header_done {
            self.header_done = true;
            return Some(MatrixRow::Header {
                dates: &self.data.dates,
            });
        }

        loop {
            let group: &'a GroupMatrix = self.data.groups.get(self.group)?;
            match self.contract {
                None => {
                    self.contract = Some(0);
                    return Some(MatrixRow::Section {
                        group: &group.group_name,
                    });
                }
                Some(idx) => match group.data.get(idx) {
                    Some(contract) => {
                        self.contract = Some(idx + 1);
                        return Some(contract_row(&self.data.dates, contract));
                    }
                    None => {
                        self.group += 1;
                        self.contract = None;
                    }
                },
            }
        }
    }
}

/// Dates and daily stats are paired by position; whichever side is longer
/// has its tail dropped.
fn contract_row<'a>(dates: &'a [String], contract: &'a ContractMatrix) -> MatrixRow<'a> {
    let cells = dates
        .iter()
        .zip(contract.daily_data.iter())
        .map(|(date, stats)| MatrixCell {
            date,
            connected: stats.connected,
            disconnected: stats.disconnected,
            percentage: stats.percentage(),
        })
        .collect();

    MatrixRow::Contract {
        name: &contract.contract_name,
        cells,
    }
}

#[derive(Debug)]
pub enum MatrixDisplay<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Table(MatrixView<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRequest {
    pub seq: u64,
    pub query: MatrixQuery,
}

/// Load status of the summary matrix, guarded by request sequence numbers
/// like [`super::list::ListState`].
#[derive(Debug, Default)]
pub struct MatrixState {
    query: MatrixQuery,
    data: Option<SummaryMatrix>,
    loading: bool,
    error: Option<String>,
    seq: u64,
    issued: bool,
}

impl MatrixState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &MatrixQuery {
        &self.query
    }

    pub fn data(&self) -> Option<&SummaryMatrix> {
        self.data.as_ref()
    }

    /// True when `query` has not been loaded yet.
    pub fn is_stale(&self, query: &MatrixQuery) -> bool {
        !self.issued || &self.query != query
    }

    pub fn load(&mut self, query: MatrixQuery) -> MatrixRequest {
        self.query = query;
        self.seq += 1;
        self.issued = true;
        self.loading = true;
        self.error = None;
        MatrixRequest {
            seq: self.seq,
            query: self.query.clone(),
        }
    }

    pub fn refetch(&mut self) -> MatrixRequest {
        let query = self.query.clone();
        self.load(query)
    }

    pub fn finish(&mut self, seq: u64, result: Result<SummaryMatrix, ApiError>) -> bool {
        if seq != self.seq {
            tracing::debug!("Dropping stale matrix response #{} (latest #{})", seq, self.seq);
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                self.data = None;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Drops the loaded matrix and any in-flight request; the next
    /// `is_stale` check is true whatever the query.
    pub fn invalidate(&mut self) {
        self.seq += 1;
        self.issued = false;
        self.loading = false;
        self.error = None;
        self.data = None;
        self.query = MatrixQuery::default();
    }

    pub fn display(&self) -> MatrixDisplay<'_> {
        if self.loading {
            return MatrixDisplay::Loading;
        }
        if let Some(err) = &self.error {
            return MatrixDisplay::Error(err);
        }
        match &self.data {
            Some(data) if !data.groups.is_empty() => MatrixDisplay::Table(MatrixView::new(data)),
            _ => MatrixDisplay::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DailyStats;

    fn stats(connected: u64, disconnected: u64) -> DailyStats {
        let total = connected + disconnected;
        DailyStats {
            date: None,
            connected,
            disconnected,
            percentage_connected: if total > 0 {
                connected as f64 * 100.0 / total as f64
            } else {
                0.0
            },
        }
    }

    fn sample_matrix() -> SummaryMatrix {
        SummaryMatrix {
            start_date: Some("2025-01-20".into()),
            end_date: Some("2025-01-21".into()),
            dates: vec!["2025-01-20".into(), "2025-01-21".into()],
            groups: vec![
                GroupMatrix {
                    group_name: "BAJAS COPPEL".into(),
                    group_id: None,
                    client_name: None,
                    data: vec![
                        ContractMatrix {
                            contract_name: "Contrato 10".into(),
                            contract_id: None,
                            daily_data: vec![stats(8, 2), stats(0, 0)],
                        },
                        ContractMatrix {
                            contract_name: "Sin Contrato".into(),
                            contract_id: None,
                            daily_data: vec![stats(3, 1), stats(4, 0)],
                        },
                    ],
                },
                GroupMatrix {
                    group_name: "GRUPO FONDO".into(),
                    group_id: None,
                    client_name: None,
                    data: vec![],
                },
            ],
        }
    }

    fn loaded(result: Result<SummaryMatrix, ApiError>) -> MatrixState {
        let mut state = MatrixState::new();
        let request = state.load(MatrixQuery::default());
        state.finish(request.seq, result);
        state
    }

    #[test]
    fn test_row_sequence() {
        let data = sample_matrix();
        let view = MatrixView::new(&data);
        let rows: Vec<MatrixRow> = view.rows().collect();

        assert_eq!(rows.len(), 5);
        assert!(matches!(rows[0], MatrixRow::Header { dates } if dates.len() == 2));
        assert_eq!(rows[1], MatrixRow::Section { group: "BAJAS COPPEL" });
        assert!(matches!(&rows[2], MatrixRow::Contract { name: "Contrato 10", cells } if cells.len() == 2));
        assert!(matches!(&rows[3], MatrixRow::Contract { name: "Sin Contrato", .. }));
        assert_eq!(rows[4], MatrixRow::Section { group: "GRUPO FONDO" });
        assert!(!rows[4].is_selectable());
    }

    #[test]
    fn test_rows_restart_and_leave_input_untouched() {
        let data = sample_matrix();
        let view = MatrixView::new(&data);

        let first: Vec<MatrixRow> = view.rows().collect();
        let second: Vec<MatrixRow> = view.rows().collect();

        assert_eq!(first, second);
        assert_eq!(data, sample_matrix());
    }

    #[test]
    fn test_zero_sample_cell_has_no_percentage() {
        let data = sample_matrix();
        let row = MatrixView::new(&data).rows().nth(2).unwrap();
        let MatrixRow::Contract { cells, .. } = row else {
            panic!("expected contract row");
        };

        assert_eq!(cells[0].percentage, Some(80.0));
        assert_eq!(cells[1].date, "2025-01-21");
        assert_eq!(cells[1].percentage, None);
    }

    #[test]
    fn test_mismatched_lengths_are_truncated() {
        let mut data = sample_matrix();
        data.dates.push("2025-01-22".into());
        data.groups[0].data[1].daily_data.truncate(1);

        let rows: Vec<MatrixRow> = MatrixView::new(&data).rows().collect();
        let cell_counts: Vec<usize> = rows
            .iter()
            .filter_map(|row| match row {
                MatrixRow::Contract { cells, .. } => Some(cells.len()),
                _ => None,
            })
            .collect();

        assert_eq!(cell_counts, vec![2, 1]);
    }

    #[test]
    fn test_empty_groups_render_empty_state() {
        let state = loaded(Ok(SummaryMatrix {
            start_date: None,
            end_date: None,
            dates: vec!["2025-01-20".into()],
            groups: vec![],
        }));
        assert!(matches!(state.display(), MatrixDisplay::Empty));
    }

    #[test]
    fn test_display_states_are_exclusive() {
        let mut state = MatrixState::new();
        state.load(MatrixQuery::default());
        assert!(matches!(state.display(), MatrixDisplay::Loading));

        let state = loaded(Err(ApiError::Network("timed out".into())));
        assert!(matches!(state.display(), MatrixDisplay::Error("Network error: timed out")));

        let state = loaded(Ok(sample_matrix()));
        assert!(matches!(state.display(), MatrixDisplay::Table(_)));
    }

    #[test]
    fn test_stale_matrix_response_dropped() {
        let mut state = MatrixState::new();
        let old = state.load(MatrixQuery {
            group_id: Some(1),
            ..Default::default()
        });
        let new = state.load(MatrixQuery {
            group_id: Some(2),
            ..Default::default()
        });

        assert!(state.finish(new.seq, Ok(sample_matrix())));
        assert!(!state.finish(old.seq, Err(ApiError::Network("late".into()))));
        assert!(matches!(state.display(), MatrixDisplay::Table(_)));
        assert_eq!(state.query().group_id, Some(2));
        assert!(!state.is_stale(&MatrixQuery {
            group_id: Some(2),
            ..Default::default()
        }));
        assert!(state.is_stale(&MatrixQuery::default()));
    }

    #[test]
    fn test_invalidate_drops_data_and_late_response() {
        let mut state = MatrixState::new();
        let request = state.load(MatrixQuery::default());
        state.invalidate();

        assert!(state.is_stale(&MatrixQuery::default()));
        assert!(!state.finish(request.seq, Ok(sample_matrix())));
        assert!(state.data().is_none());
    }
}
