/// Responsible for formatting tool outputs for display
pub trait Render: Send + Sync + 'static {
    /// Short status line for logs and the interactive front end
    fn status(&self) -> String;

    /// The full text handed to the response composer
    fn render(&self) -> String;
}
