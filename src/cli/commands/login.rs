use super::{render_dashboard, report_form_outcome};
use crate::cli::utils::LineReader;
use crate::cli::OutputFormat;
use crate::model::Credentials;
use crate::shell::App;

pub async fn handle(
    mut app: App,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => LineReader::stdin().prompt_secret("Password").await?,
    };

    app.start().await;
    app.login_form().set_draft(Credentials::new(email, password));

    let outcome = app.submit_login().await;
    if !report_form_outcome(&output_format, &outcome, "Logged in")? {
        anyhow::bail!("login failed");
    }

    render_dashboard(&app, &output_format)
}
