use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    repository::Repository,
};

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteServiceError {
    #[error("Title and content are required")]
    MissingFields,

    #[error("Note not found")]
    NotFound,
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
}

impl NoteService {
    pub const fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let (title, content) = required_fields(request.title, request.content)?;

        Ok(self.repo.lock().await.create_note(title, content).into())
    }

    /// Absent fields keep their current value.
    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let mut repo = self.repo.lock().await;
        let current = repo.get_one_note(id).ok_or(NoteServiceError::NotFound)?;

        let title = request.title.unwrap_or(current.title);
        let content = request.content.unwrap_or(current.content);

        repo.update_note(id, title, content)
            .map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound)
    }

    pub async fn delete_note(&self, id: i64) -> Result<NoteResponse, NoteServiceError> {
        self.repo
            .lock()
            .await
            .delete_note(id)
            .map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound)
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, NoteServiceError> {
        self.repo
            .lock()
            .await
            .get_one_note(id)
            .map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound)
    }

    pub async fn get_all_notes(&self) -> Vec<NoteResponse> {
        self.repo
            .lock()
            .await
            .get_all_notes()
            .into_iter()
            .map(NoteResponse::from)
            .collect()
    }
}

fn required_fields(
    title: Option<String>,
    content: Option<String>,
) -> Result<(String, String), NoteServiceError> {
    match (title, content) {
        (Some(title), Some(content)) => Ok((title, content)),
        _ => Err(NoteServiceError::MissingFields),
    }
}
