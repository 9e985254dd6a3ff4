use clap::Args;

use super::report_form_outcome;
use crate::cli::utils::{output_success, LineReader};
use crate::cli::OutputFormat;
use crate::forms::REGISTERED_MESSAGE;
use crate::model::{Address, Registration};
use crate::shell::App;

/// Registration fields; anything left out is prompted for
#[derive(Args, Debug, Default)]
pub struct SignupArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, help = "Date of birth (YYYY-MM-DD)")]
    pub date_of_birth: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip_code: Option<String>,
    #[arg(long, help = "Password (will prompt if not provided)")]
    pub password: Option<String>,
}

impl SignupArgs {
    async fn into_registration(self, input: &mut LineReader) -> anyhow::Result<Registration> {
        Ok(Registration {
            full_name: or_prompt(input, self.full_name, "Full Name").await?,
            email: or_prompt(input, self.email, "Email").await?,
            date_of_birth: or_prompt(input, self.date_of_birth, "Date of Birth (YYYY-MM-DD)").await?,
            address: Address {
                street: or_prompt(input, self.street, "Address").await?,
                city: or_prompt(input, self.city, "City").await?,
                state: or_prompt(input, self.state, "State").await?,
                zip_code: or_prompt(input, self.zip_code, "Post Code").await?,
            },
            password: match self.password {
                Some(password) => password,
                None => input.prompt_secret("Password").await?,
            },
        })
    }
}

async fn or_prompt(input: &mut LineReader, given: Option<String>, label: &str) -> anyhow::Result<String> {
    match given {
        Some(value) => Ok(value),
        None => input.prompt_with_default(label, "").await,
    }
}

pub async fn handle(mut app: App, args: SignupArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut input = LineReader::stdin();
    let draft = args.into_registration(&mut input).await?;

    app.signup_form().set_draft(draft);
    let outcome = app.submit_signup().await;
    if !report_form_outcome(&output_format, &outcome, "User Registered")? {
        anyhow::bail!("registration failed");
    }

    output_success(&output_format, REGISTERED_MESSAGE, None)?;
    app.acknowledge_registration().await;
    Ok(())
}
