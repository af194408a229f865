use reqwest::Client;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use streak_types::api::{
    CreateHabitRequest, CreateNoteRequest, DeleteResponse, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, ToggleCheckmarkRequest, UpdateNoteRequest,
    UserExistsRequest, UserExistsResponse,
};
use streak_types::models::{Habit, Note};

/// HTTP client for the streak server. Holds the bearer token and the
/// authenticated email after a successful register/login.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Option<String>,
    email: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
            token: None,
            email: None,
        }
    }

    /// Email of the authenticated user, once logged in.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, String> {
        let resp = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let body: RegisterResponse = parse(resp).await?;
        self.token = Some(body.token.clone());
        self.email = Some(email.to_string());
        Ok(body)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, String> {
        let resp = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let body: LoginResponse = parse(resp).await?;
        self.token = Some(body.token.clone());
        self.email = Some(body.email.clone());
        Ok(body)
    }

    pub async fn user_exists(&self, email: &str) -> Result<bool, String> {
        let resp = self
            .http
            .post(format!("{}/auth/exists", self.base_url))
            .json(&UserExistsRequest {
                email: email.to_string(),
            })
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let body: UserExistsResponse = parse(resp).await?;
        Ok(body.exists)
    }

    /// `month` is the zero-based wire month (0 = January).
    pub async fn list_habits(&self, month: u32, year: i32) -> Result<Vec<Habit>, String> {
        let url = format!(
            "{}/habits?month={}&year={}",
            self.base_url, month, year
        );
        let resp = self
            .authorized(self.http.get(url))?
            .send()
            .await
            .map_err(|e| format!("Failed to fetch habits: {}", e))?;
        parse(resp).await
    }

    pub async fn create_habit(
        &self,
        name: &str,
        created_at: Option<String>,
    ) -> Result<Habit, String> {
        let resp = self
            .authorized(self.http.post(format!("{}/habits", self.base_url)))?
            .json(&CreateHabitRequest {
                name: name.to_string(),
                created_at,
            })
            .send()
            .await
            .map_err(|e| format!("Failed to create habit: {}", e))?;
        parse(resp).await
    }

    pub async fn toggle_checkmark(&self, habit_id: Uuid, day_index: usize) -> Result<Habit, String> {
        let url = format!("{}/habits/{}/checkmarks", self.base_url, habit_id);
        let resp = self
            .authorized(self.http.put(url))?
            .json(&ToggleCheckmarkRequest { day_index })
            .send()
            .await
            .map_err(|e| format!("Failed to toggle checkmark: {}", e))?;
        parse(resp).await
    }

    pub async fn delete_habit(&self, habit_id: Uuid) -> Result<(), String> {
        let url = format!("{}/habits/{}", self.base_url, habit_id);
        let resp = self
            .authorized(self.http.delete(url))?
            .send()
            .await
            .map_err(|e| format!("Failed to delete habit: {}", e))?;
        let _: DeleteResponse = parse(resp).await?;
        Ok(())
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>, String> {
        let resp = self
            .authorized(self.http.get(format!("{}/notes", self.base_url)))?
            .send()
            .await
            .map_err(|e| format!("Failed to fetch notes: {}", e))?;
        parse(resp).await
    }

    pub async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note, String> {
        let resp = self
            .authorized(self.http.post(format!("{}/notes", self.base_url)))?
            .json(req)
            .send()
            .await
            .map_err(|e| format!("Failed to create note: {}", e))?;
        parse(resp).await
    }

    pub async fn update_note(
        &self,
        note_id: Uuid,
        content: &str,
        updated_at: &str,
    ) -> Result<Note, String> {
        let url = format!("{}/notes/{}", self.base_url, note_id);
        let resp = self
            .authorized(self.http.put(url))?
            .json(&UpdateNoteRequest {
                content: content.to_string(),
                updated_at: updated_at.to_string(),
            })
            .send()
            .await
            .map_err(|e| format!("Failed to update note: {}", e))?;
        parse(resp).await
    }

    pub async fn delete_note(&self, note_id: Uuid) -> Result<(), String> {
        let url = format!("{}/notes/{}", self.base_url, note_id);
        let resp = self
            .authorized(self.http.delete(url))?
            .send()
            .await
            .map_err(|e| format!("Failed to delete note: {}", e))?;
        let _: DeleteResponse = parse(resp).await?;
        Ok(())
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, String> {
        let token = self.token.as_ref().ok_or("Not logged in")?;
        Ok(builder.header("Authorization", format!("Bearer {}", token)))
    }
}

async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, String> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(format!("Request failed ({}): {}", status, body));
    }
    resp.json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
