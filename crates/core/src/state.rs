//! Application state machine.
//!
//! Owns the single source of truth for the upload -> generate -> edit -> reset
//! flow: the uploaded photo, the profession, the current generated image, the
//! pending edit instruction, the busy flag and the error slot. Which of the
//! four screens is visible is derived from those fields, never stored.
//!
//! The machine is UI-agnostic: triggering an action returns the parameters of
//! the remote call to dispatch, and the call's completion is fed back in as a
//! [`TaskOutcome`]. At most one request is in flight at a time; triggers are
//! inert while one is pending.

use crate::codec::{self, UploadedImage};
use crate::error::Operation;

/// Generated images always come back from the API as PNG.
const GENERATED_MIME_TYPE: &str = "image/png";

/// The four logical screens. Exactly one is visible at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for a photo and a profession.
    Upload,
    /// A generate or edit call is in flight.
    Loading,
    /// A call failed; only recovery is "start over".
    Error,
    /// Showing the current generated image and the edit controls.
    Result,
}

/// Parameters of a remote call the caller must now dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub operation: Operation,
    /// Base64 image payload, without data-URL header.
    pub payload: String,
    pub mime_type: String,
    /// The profession for generate, the edit text for edit.
    pub instruction: String,
}

/// Completion event for an in-flight remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The call produced a new image payload (base64, no header).
    Completed {
        operation: Operation,
        payload: String,
    },
    /// The call failed; the message is already user-facing.
    Failed {
        operation: Operation,
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    uploaded: Option<UploadedImage>,
    profession: String,
    edit_instruction: String,
    /// Current generated image as a displayable data-URL.
    generated: Option<String>,
    pending: bool,
    error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the visible screen from the state fields.
    pub fn screen(&self) -> Screen {
        if self.pending {
            Screen::Loading
        } else if self.error.is_some() {
            Screen::Error
        } else if self.generated.is_some() {
            Screen::Result
        } else {
            Screen::Upload
        }
    }

    /// Stores a newly selected photo, replacing any previous one and
    /// clearing a stale error.
    ///
    /// Non-image files are silently ignored, as is any selection made while
    /// a request is pending. Returns whether the image was accepted.
    pub fn upload(&mut self, image: UploadedImage) -> bool {
        if self.pending || !image.is_image() {
            return false;
        }
        self.uploaded = Some(image);
        self.error = None;
        true
    }

    /// Records a local file-read failure in the error slot.
    pub fn fail_upload(&mut self, message: String) {
        if self.pending {
            return;
        }
        self.error = Some(message);
    }

    pub fn profession_mut(&mut self) -> &mut String {
        &mut self.profession
    }

    pub fn edit_instruction_mut(&mut self) -> &mut String {
        &mut self.edit_instruction
    }

    /// Whether the generate trigger is currently actionable.
    pub fn can_generate(&self) -> bool {
        !self.pending && self.uploaded.is_some() && !self.profession.is_empty()
    }

    /// Whether the edit trigger is currently actionable.
    pub fn can_edit(&self) -> bool {
        !self.pending && self.generated.is_some() && !self.edit_instruction.is_empty()
    }

    /// Triggers the initial generation.
    ///
    /// Requires an uploaded photo and a non-empty profession; otherwise this
    /// is a no-op returning `None`. On success the machine enters Loading,
    /// dropping any prior error and prior generated image.
    pub fn begin_generate(&mut self) -> Option<RemoteRequest> {
        if !self.can_generate() {
            return None;
        }
        let image = self.uploaded.as_ref()?;
        let request = RemoteRequest {
            operation: Operation::Generate,
            payload: image.payload.clone(),
            mime_type: image.mime_type.clone(),
            instruction: self.profession.clone(),
        };
        self.pending = true;
        self.error = None;
        self.generated = None;
        Some(request)
    }

    /// Triggers an edit of the currently displayed image.
    ///
    /// Requires a generated image and a non-empty instruction; otherwise a
    /// no-op returning `None`. The displayed image's payload is re-submitted
    /// as-is; it stays stored until the edit settles.
    pub fn begin_edit(&mut self) -> Option<RemoteRequest> {
        if !self.can_edit() {
            return None;
        }
        let data_url = self.generated.as_deref()?;
        let request = RemoteRequest {
            operation: Operation::Edit,
            payload: codec::data_url_payload(data_url).to_string(),
            mime_type: GENERATED_MIME_TYPE.to_string(),
            instruction: self.edit_instruction.clone(),
        };
        self.pending = true;
        self.error = None;
        Some(request)
    }

    /// Applies the completion of the in-flight call.
    ///
    /// Success stores the new image as a data-URL (replacing the old one
    /// wholesale) and, for edits, clears the instruction. Failure stores the
    /// message, which routes the view to the Error screen.
    pub fn finish(&mut self, outcome: TaskOutcome) {
        self.pending = false;
        match outcome {
            TaskOutcome::Completed { operation, payload } => {
                self.generated = Some(codec::to_data_url(&payload, GENERATED_MIME_TYPE));
                if operation == Operation::Edit {
                    self.edit_instruction.clear();
                }
            }
            TaskOutcome::Failed { message, .. } => {
                self.error = Some(message);
            }
        }
    }

    /// Discards all in-progress work and returns to the initial Upload state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn uploaded(&self) -> Option<&UploadedImage> {
        self.uploaded.as_ref()
    }

    /// The current generated image as a data-URL, if any.
    pub fn generated(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn profession(&self) -> &str {
        &self.profession
    }

    pub fn edit_instruction(&self) -> &str {
        &self.edit_instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_bytes;
    use crate::error::{AppError, user_facing_message};

    fn jpeg_upload() -> UploadedImage {
        encode_bytes(&[0xff, 0xd8, 0xff], "image/jpeg")
    }

    fn state_with_upload(profession: &str) -> AppState {
        let mut state = AppState::new();
        assert!(state.upload(jpeg_upload()));
        *state.profession_mut() = profession.to_string();
        state
    }

    fn state_showing_result(data_payload: &str) -> AppState {
        let mut state = state_with_upload("Astronaut");
        state.begin_generate().unwrap();
        state.finish(TaskOutcome::Completed {
            operation: Operation::Generate,
            payload: data_payload.to_string(),
        });
        state
    }

    #[test]
    fn starts_on_the_upload_screen() {
        let state = AppState::new();
        assert_eq!(state.screen(), Screen::Upload);
        assert!(!state.can_generate());
    }

    #[test]
    fn generate_requires_image_and_profession() {
        // Profession but no image.
        let mut state = AppState::new();
        *state.profession_mut() = "Chef".to_string();
        assert!(state.begin_generate().is_none());
        assert_eq!(state.screen(), Screen::Upload);

        // Image but empty profession.
        let mut state = AppState::new();
        state.upload(jpeg_upload());
        assert!(state.begin_generate().is_none());
        assert_eq!(state.screen(), Screen::Upload);
        assert!(!state.is_pending());
    }

    #[test]
    fn generate_moves_to_loading_then_result() {
        // Scenario A: JPEG + "Astronaut", remote returns "abc123".
        let mut state = state_with_upload("Astronaut");

        let request = state.begin_generate().expect("guard satisfied");
        assert_eq!(request.operation, Operation::Generate);
        assert_eq!(request.mime_type, "image/jpeg");
        assert_eq!(request.instruction, "Astronaut");
        assert_eq!(state.screen(), Screen::Loading);

        state.finish(TaskOutcome::Completed {
            operation: Operation::Generate,
            payload: "abc123".to_string(),
        });
        assert_eq!(state.screen(), Screen::Result);
        assert_eq!(state.generated(), Some("data:image/png;base64,abc123"));
    }

    #[test]
    fn generate_failure_lands_on_the_error_screen() {
        // Scenario B: response carried no image part.
        let mut state = state_with_upload("Astronaut");
        state.begin_generate().unwrap();

        let err = AppError::NoImageReturned(Operation::Generate);
        state.finish(TaskOutcome::Failed {
            operation: Operation::Generate,
            message: user_facing_message(Operation::Generate, &err),
        });
        assert_eq!(state.screen(), Screen::Error);
        assert_eq!(
            state.error(),
            Some("No image was generated. The response may have been blocked.")
        );
        assert_eq!(state.generated(), None);
    }

    #[test]
    fn triggering_generate_clears_prior_error_and_image() {
        let mut state = state_showing_result("abc123");
        state.fail_upload("stale".to_string());
        assert_eq!(state.screen(), Screen::Error);

        state.begin_generate().unwrap();
        assert_eq!(state.screen(), Screen::Loading);
        assert_eq!(state.error(), None);
        assert_eq!(state.generated(), None);
    }

    #[test]
    fn edit_requires_result_and_instruction() {
        // No generated image yet.
        let mut state = state_with_upload("Astronaut");
        *state.edit_instruction_mut() = "add a hat".to_string();
        assert!(state.begin_edit().is_none());

        // Generated image, empty instruction.
        let mut state = state_showing_result("abc123");
        assert!(state.begin_edit().is_none());
        assert_eq!(state.screen(), Screen::Result);
    }

    #[test]
    fn successful_edit_replaces_image_and_clears_instruction() {
        // Scenario C: edit "add a hat" returns "xyz789".
        let mut state = state_showing_result("abc123");
        *state.edit_instruction_mut() = "add a hat".to_string();

        let request = state.begin_edit().expect("guard satisfied");
        assert_eq!(request.operation, Operation::Edit);
        assert_eq!(request.payload, "abc123");
        assert_eq!(request.mime_type, "image/png");
        assert_eq!(request.instruction, "add a hat");
        assert_eq!(state.screen(), Screen::Loading);
        // The old image stays stored until the call settles.
        assert!(state.generated().is_some());

        state.finish(TaskOutcome::Completed {
            operation: Operation::Edit,
            payload: "xyz789".to_string(),
        });
        assert_eq!(state.screen(), Screen::Result);
        assert_eq!(state.generated(), Some("data:image/png;base64,xyz789"));
        assert_eq!(state.edit_instruction(), "");
    }

    #[test]
    fn failed_edit_drops_to_the_error_screen_not_result() {
        // The asymmetric recovery path, preserved on purpose: the previously
        // generated image is no longer shown.
        let mut state = state_showing_result("abc123");
        *state.edit_instruction_mut() = "add a hat".to_string();
        state.begin_edit().unwrap();

        state.finish(TaskOutcome::Failed {
            operation: Operation::Edit,
            message: Operation::Edit.failure_message().to_string(),
        });
        assert_eq!(state.screen(), Screen::Error);
        // The instruction is only cleared on success.
        assert_eq!(state.edit_instruction(), "add a hat");
    }

    #[test]
    fn triggers_are_inert_while_pending() {
        let mut state = state_with_upload("Astronaut");
        state.begin_generate().unwrap();

        assert!(state.begin_generate().is_none());
        assert!(state.begin_edit().is_none());
        assert!(!state.upload(jpeg_upload()));
        state.fail_upload("ignored".to_string());
        assert_eq!(state.screen(), Screen::Loading);
    }

    #[test]
    fn non_image_drop_is_a_silent_no_op() {
        // Scenario D: dropping a text/plain file changes nothing.
        let mut state = AppState::new();
        let accepted = state.upload(encode_bytes(b"hello", "text/plain"));
        assert!(!accepted);
        assert!(state.uploaded().is_none());
        assert_eq!(state.error(), None);
        assert_eq!(state.screen(), Screen::Upload);
    }

    #[test]
    fn upload_clears_a_stale_error() {
        let mut state = AppState::new();
        state.fail_upload("Failed to read the image file.".to_string());
        assert_eq!(state.screen(), Screen::Error);

        assert!(state.upload(jpeg_upload()));
        assert_eq!(state.error(), None);
        assert_eq!(state.screen(), Screen::Upload);
    }

    #[test]
    fn start_over_clears_everything() {
        let mut state = state_showing_result("abc123");
        *state.edit_instruction_mut() = "add a hat".to_string();
        state.finish(TaskOutcome::Failed {
            operation: Operation::Edit,
            message: "boom".to_string(),
        });

        state.reset();
        assert_eq!(state.screen(), Screen::Upload);
        assert!(state.uploaded().is_none());
        assert_eq!(state.profession(), "");
        assert_eq!(state.edit_instruction(), "");
        assert_eq!(state.generated(), None);
        assert_eq!(state.error(), None);
        assert!(!state.is_pending());
    }
}
