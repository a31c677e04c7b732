use crate::api::ApiError;
use crate::api::types::{FinalStatus, Register, RegisterType, RegisterUpdate, Responsible};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Tipo,
    EstatusFinal,
    Responsable,
    Comentario,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        EditField::Tipo,
        EditField::EstatusFinal,
        EditField::Responsable,
        EditField::Comentario,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Tipo => "Tipo",
            EditField::EstatusFinal => "Estatus Final",
            EditField::Responsable => "Responsable",
            EditField::Comentario => "Comentario",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// New value for one editable field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Tipo(RegisterType),
    EstatusFinal(Option<FinalStatus>),
    Responsable(Responsible),
    Comentario(String),
}

impl FieldValue {
    pub fn field(&self) -> EditField {
        match self {
            FieldValue::Tipo(_) => EditField::Tipo,
            FieldValue::EstatusFinal(_) => EditField::EstatusFinal,
            FieldValue::Responsable(_) => EditField::Responsable,
            FieldValue::Comentario(_) => EditField::Comentario,
        }
    }
}

/// Staged edit of one register.
///
/// Holds a private copy of the mutable fields taken at `open`; nothing here
/// touches the list the register came from. Saving produces a
/// [`RegisterUpdate`] that the caller sends; the outcome comes back through
/// [`RegisterEditor::save_finished`].
#[derive(Debug, Clone)]
pub struct RegisterEditor {
    register: Register,
    staged: RegisterUpdate,
    focus: EditField,
    saving: bool,
    error: Option<String>,
}

/// What the caller must do after a save completes.
#[derive(Debug, PartialEq)]
pub enum SaveOutcome {
    /// Close the editor and refetch the list.
    Saved,
    /// Keep the editor open; the message is shown as an alert.
    Failed(String),
}

impl RegisterEditor {
    pub fn open(register: &Register) -> Self {
        Self {
            staged: RegisterUpdate {
                tipo: register.tipo,
                estatus_final: register.estatus_final,
                responsable: register.responsable,
                comentario: register.comentario.clone(),
            },
            register: register.clone(),
            focus: EditField::Tipo,
            saving: false,
            error: None,
        }
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn register_id(&self) -> i64 {
        self.register.id
    }

    pub fn staged(&self) -> &RegisterUpdate {
        &self.staged
    }

    pub fn focus(&self) -> EditField {
        self.focus
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Updates the staged copy only.
    pub fn change(&mut self, value: FieldValue) {
        match value {
            FieldValue::Tipo(tipo) => self.staged.tipo = tipo,
            FieldValue::EstatusFinal(status) => self.staged.estatus_final = status,
            FieldValue::Responsable(responsable) => self.staged.responsable = responsable,
            FieldValue::Comentario(text) => self.staged.comentario = text,
        }
    }

    pub fn focus_next(&mut self) {
        let idx = (self.focus.index() + 1) % EditField::ALL.len();
        self.focus = EditField::ALL[idx];
    }

    pub fn focus_prev(&mut self) {
        let len = EditField::ALL.len();
        let idx = (self.focus.index() + len - 1) % len;
        self.focus = EditField::ALL[idx];
    }

    /// Steps the focused enumerated field forward or back through its choices.
    /// Final status cycles through "blank" as well.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            EditField::Tipo => {
                let next = step(&RegisterType::ALL, self.staged.tipo, forward);
                self.change(FieldValue::Tipo(next));
            }
            EditField::Responsable => {
                let next = step(&Responsible::ALL, self.staged.responsable, forward);
                self.change(FieldValue::Responsable(next));
            }
            EditField::EstatusFinal => {
                let mut choices: Vec<Option<FinalStatus>> = vec![None];
                choices.extend(FinalStatus::ALL.iter().copied().map(Some));
                let next = step(&choices, self.staged.estatus_final, forward);
                self.change(FieldValue::EstatusFinal(next));
            }
            EditField::Comentario => {}
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == EditField::Comentario {
            self.staged.comentario.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.focus == EditField::Comentario {
            self.staged.comentario.pop();
        }
    }

    /// Marks the editor busy and returns the partial update to send, keyed by
    /// register id. `None` while a save is already in flight.
    pub fn begin_save(&mut self) -> Option<(i64, RegisterUpdate)> {
        if self.saving {
            return None;
        }
        self.saving = true;
        self.error = None;
        Some((self.register.id, self.staged.clone()))
    }

    /// Staged edits survive a failure so the operator can retry.
    pub fn save_finished(&mut self, result: Result<Register, ApiError>) -> SaveOutcome {
        self.saving = false;
        match result {
            Ok(updated) => {
                tracing::info!("Register {} saved", updated.id);
                SaveOutcome::Saved
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                SaveOutcome::Failed(message)
            }
        }
    }
}

fn step<T: Copy + PartialEq>(choices: &[T], current: T, forward: bool) -> T {
    let len = choices.len();
    let idx = choices.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    choices[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_register() -> Register {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "vin": "1HGCM82633A004352",
            "client_description": "COPPEL",
            "problem": "Desconexión en base",
            "last_connection": "2025-01-20T08:15:00Z",
            "tipo": "MAL FUNCIONAMIENTO",
            "estatus_final": "TALLER",
            "responsable": "SIN ESTATUS DEL CLIENTE",
            "comentario": "original"
        }))
        .unwrap()
    }

    #[test]
    fn test_cancel_then_reopen_is_fresh() {
        let register = sample_register();

        let mut editor = RegisterEditor::open(&register);
        editor.change(FieldValue::Comentario("x".into()));
        drop(editor); // cancel: no request

        let reopened = RegisterEditor::open(&register);
        assert_eq!(reopened.staged().comentario, "original");
        assert_eq!(register.comentario, "original");
    }

    #[test]
    fn test_save_sends_only_mutable_fields() {
        let mut editor = RegisterEditor::open(&sample_register());
        editor.change(FieldValue::Tipo(RegisterType::Operation));
        editor.change(FieldValue::EstatusFinal(None));

        let (id, update) = editor.begin_save().unwrap();
        assert_eq!(id, 42);

        let body = serde_json::to_value(&update).unwrap();
        let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["comentario", "estatus_final", "responsable", "tipo"]);
        assert_eq!(body["tipo"], "OPERACIÓN");
        assert_eq!(body["estatus_final"], "");
    }

    #[test]
    fn test_double_save_is_refused() {
        let mut editor = RegisterEditor::open(&sample_register());
        assert!(editor.begin_save().is_some());
        assert!(editor.begin_save().is_none());
    }

    #[test]
    fn test_failed_save_keeps_staged_edits() {
        let mut editor = RegisterEditor::open(&sample_register());
        editor.change(FieldValue::Comentario("revisado".into()));
        editor.begin_save();

        let outcome = editor.save_finished(Err(ApiError::Client {
            status: 400,
            body: "bad tipo".into(),
        }));

        assert_eq!(outcome, SaveOutcome::Failed("Request rejected (400): bad tipo".into()));
        assert_eq!(editor.staged().comentario, "revisado");
        assert!(!editor.is_saving());
        assert!(editor.error().is_some());
    }

    #[test]
    fn test_successful_save() {
        let register = sample_register();
        let mut editor = RegisterEditor::open(&register);
        editor.begin_save();
        assert_eq!(editor.save_finished(Ok(register)), SaveOutcome::Saved);
    }

    #[test]
    fn test_cycle_walks_choices() {
        let mut editor = RegisterEditor::open(&sample_register());

        editor.cycle(true);
        assert_eq!(editor.staged().tipo, RegisterType::Operation);
        editor.cycle(true);
        assert_eq!(editor.staged().tipo, RegisterType::Malfunction);

        editor.focus_next();
        assert_eq!(editor.focus(), EditField::EstatusFinal);
        editor.cycle(false);
        assert_eq!(editor.staged().estatus_final, Some(FinalStatus::SignalLoss));

        editor.focus_prev();
        editor.focus_prev();
        assert_eq!(editor.focus(), EditField::Comentario);
        editor.push_char('!');
        editor.pop_char();
        editor.pop_char();
        assert_eq!(editor.staged().comentario, "origina");
    }
}
