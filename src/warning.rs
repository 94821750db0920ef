#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningCode {
    BboxNotQuadrilateral,
    RowsPadded,
    OutputRenamed,
    NoImagesFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutWarning {
    pub code: WarningCode,
    pub message: String,
    pub image: Option<String>,
    pub token_index: Option<usize>,
}

impl LayoutWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            image: None,
            token_index: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_token_index(mut self, index: usize) -> Self {
        self.token_index = Some(index);
        self
    }
}
