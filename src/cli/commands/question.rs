use tabled::{Table, Tabled};

use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis, yes_no};
use crate::db::{DbError, Id, Question, QuestionRepository, ReferenceList};

/// Which subset of questions `list` shows.
#[derive(Debug, Clone, Copy, Default)]
pub enum QuestionFilter {
    #[default]
    All,
    Step(Id),
    Form(Id),
}

#[derive(Debug, Default)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub id_entry: Id,
    pub id_step: Id,
    pub visible_multiview_global: bool,
    pub visible_multiview_form_selected: bool,
    pub column_title: Option<String>,
}

#[derive(Debug, Default)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub id_entry: Option<Id>,
    pub id_step: Option<Id>,
    pub visible_multiview_global: Option<bool>,
    pub visible_multiview_form_selected: Option<bool>,
    pub column_title: Option<String>,
}

impl UpdateQuestionRequest {
    fn apply(self, question: &mut Question) {
        if let Some(title) = self.title {
            question.title = title;
        }
        if let Some(code) = self.code {
            question.code = code;
        }
        if let Some(description) = self.description {
            question.description = description;
        }
        if let Some(id_entry) = self.id_entry {
            question.id_entry = id_entry;
        }
        if let Some(id_step) = self.id_step {
            question.id_step = id_step;
        }
        if let Some(flag) = self.visible_multiview_global {
            question.visible_multiview_global = flag;
        }
        if let Some(flag) = self.visible_multiview_form_selected {
            question.visible_multiview_form_selected = flag;
        }
        if let Some(column_title) = self.column_title {
            question.column_title = column_title;
        }
    }
}

#[derive(Tabled)]
pub(crate) struct QuestionDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: Id,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Code")]
    pub(crate) code: String,
    #[tabled(rename = "Step")]
    pub(crate) step: String,
    #[tabled(rename = "Column")]
    pub(crate) column_title: String,
}

impl From<&Question> for QuestionDisplay {
    fn from(question: &Question) -> Self {
        let step = match &question.step {
            Some(step) if !step.title.is_empty() => format!("{} ({})", step.title, step.id),
            _ => question.id_step.to_string(),
        };
        Self {
            id: question.id,
            title: truncate_with_ellipsis(&question.title, 50),
            code: question.code.clone(),
            step,
            column_title: or_dash(Some(question.column_title.as_str())),
        }
    }
}

#[derive(Tabled)]
struct ReferenceDisplay {
    #[tabled(rename = "ID")]
    id: Id,
    #[tabled(rename = "Title")]
    label: String,
}

fn validate_title(title: &str) -> CliResult<()> {
    if title.trim().is_empty() {
        return Err(DbError::Validation {
            message: "question title cannot be empty".to_string(),
        }
        .into());
    }
    Ok(())
}

/// List questions, optionally restricted to a step or a form
pub async fn list_questions<R: QuestionRepository>(
    repo: &R,
    filter: QuestionFilter,
    format: &str,
) -> CliResult<String> {
    let questions = match filter {
        QuestionFilter::All => repo.list().await?,
        QuestionFilter::Step(id_step) => repo.list_by_step(id_step).await?,
        QuestionFilter::Form(id_form) => repo.list_by_form(id_form).await?,
    };

    match format {
        "json" => Ok(serde_json::to_string_pretty(&questions)?),
        _ => Ok(format_table(&questions)),
    }
}

pub(crate) fn format_table(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "No questions found.".to_string();
    }

    let display: Vec<QuestionDisplay> = questions.iter().map(|q| q.into()).collect();
    let mut table = Table::new(display);
    apply_table_style(&mut table);
    table.to_string()
}

/// Get a single question by ID
pub async fn get_question<R: QuestionRepository>(
    repo: &R,
    id: Id,
    format: &str,
) -> CliResult<String> {
    let question = repo
        .load(id)
        .await?
        .ok_or_else(|| DbError::not_found("Question", id))?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&question)?),
        _ => {
            use tabled::builder::Builder;

            let entry = question.entry.as_ref().map(|e| e.title.as_str());
            let step = question.step.as_ref().map(|s| s.title.as_str());
            let form = question.step.as_ref().map(|s| s.id_form.to_string());

            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["ID", &question.id.to_string()]);
            builder.push_record(["Title", &question.title]);
            builder.push_record(["Code", &question.code]);
            builder.push_record([
                "Description",
                &truncate_with_ellipsis(&question.description, 200),
            ]);
            builder.push_record([
                "Entry",
                &format!("{} ({})", or_dash(entry), question.id_entry),
            ]);
            builder.push_record(["Step", &format!("{} ({})", or_dash(step), question.id_step)]);
            builder.push_record(["Form", &or_dash(form.as_deref())]);
            builder.push_record([
                "Multiview (global)",
                &yes_no(question.visible_multiview_global),
            ]);
            builder.push_record([
                "Multiview (form selected)",
                &yes_no(question.visible_multiview_form_selected),
            ]);
            builder.push_record(["Column title", &or_dash(Some(question.column_title.as_str()))]);

            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Create a new question
pub async fn create_question<R: QuestionRepository>(
    repo: &R,
    request: CreateQuestionRequest,
) -> CliResult<String> {
    validate_title(&request.title)?;

    let question = Question {
        title: request.title,
        code: request.code,
        description: request.description.unwrap_or_default(),
        id_entry: request.id_entry,
        id_step: request.id_step,
        visible_multiview_global: request.visible_multiview_global,
        visible_multiview_form_selected: request.visible_multiview_form_selected,
        column_title: request.column_title.unwrap_or_default(),
        ..Default::default()
    };

    let id = repo.insert(&question).await?;
    Ok(format!("✓ Created question: {} ({})", question.title, id))
}

/// Update the given fields of an existing question
pub async fn update_question<R: QuestionRepository>(
    repo: &R,
    id: Id,
    request: UpdateQuestionRequest,
) -> CliResult<String> {
    if let Some(title) = &request.title {
        validate_title(title)?;
    }

    let mut question = repo
        .load(id)
        .await?
        .ok_or_else(|| DbError::not_found("Question", id))?;

    request.apply(&mut question);
    repo.store(&question).await?;

    Ok(format!("✓ Updated question: {} ({})", question.title, id))
}

/// Delete a question
pub async fn delete_question<R: QuestionRepository>(repo: &R, id: Id) -> CliResult<String> {
    repo.delete(id).await?;
    Ok(format!("✓ Deleted question: {}", id))
}

/// List question ids only
pub async fn list_question_ids<R: QuestionRepository>(repo: &R, format: &str) -> CliResult<String> {
    let ids = repo.list_ids().await?;

    match format {
        "json" => Ok(serde_json::to_string(&ids)?),
        _ => Ok(ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// List `(id, title)` pairs, optionally for one form
pub async fn list_references<R: QuestionRepository>(
    repo: &R,
    id_form: Option<Id>,
    format: &str,
) -> CliResult<String> {
    let references: ReferenceList = match id_form {
        Some(id_form) => repo.reference_list_by_form(id_form).await?,
        None => repo.reference_list().await?,
    };

    match format {
        "json" => Ok(serde_json::to_string_pretty(&references)?),
        _ => {
            if references.is_empty() {
                return Ok("No questions found.".to_string());
            }
            let display: Vec<ReferenceDisplay> = references
                .into_iter()
                .map(|item| ReferenceDisplay {
                    id: item.id,
                    label: item.label,
                })
                .collect();
            let mut table = Table::new(display);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Reject mutually exclusive list filters
pub fn parse_filter(step: Option<Id>, form: Option<Id>) -> CliResult<QuestionFilter> {
    match (step, form) {
        (Some(_), Some(_)) => Err(CliError::InvalidArgument {
            message: "--step and --form cannot be combined".to_string(),
        }),
        (Some(id_step), None) => Ok(QuestionFilter::Step(id_step)),
        (None, Some(id_form)) => Ok(QuestionFilter::Form(id_form)),
        (None, None) => Ok(QuestionFilter::All),
    }
}
