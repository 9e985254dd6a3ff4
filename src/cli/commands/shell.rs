// Interactive session: the process lifetime is the session lifetime, so the
// credential obtained by `login` lasts until `logout` or `quit`.

use serde_json::json;

use super::{render_dashboard, report_form_outcome, report_sync_result};
use crate::cli::utils::{output_error, output_success, LineReader};
use crate::cli::OutputFormat;
use crate::error::ClientResult;
use crate::forms::REGISTERED_MESSAGE;
use crate::model::{Category, Credentials, Registration};
use crate::route::Route;
use crate::shell::App;

enum Flow {
    Continue,
    Quit,
}

pub async fn handle(mut app: App, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut input = LineReader::stdin();

    app.start().await;
    show_route(&app, &output_format)?;

    loop {
        let prompt = format!("catcon {}> ", app.route());
        let Some(line) = input.prompt(&prompt).await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let (command, rest) = split_command(&line);

        match dispatch(&mut app, &mut input, command, rest, &output_format).await? {
            Flow::Continue => {}
            Flow::Quit => break,
        }
    }

    Ok(())
}

async fn dispatch(
    app: &mut App,
    input: &mut LineReader,
    command: &str,
    rest: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<Flow> {
    match (app.route(), command) {
        (_, "quit" | "exit") => return Ok(Flow::Quit),
        (_, "help") => print_help(app.route()),
        (_, "status") => output_success(
            output_format,
            &format!("At {} (authenticated: {})", app.route(), app.is_authenticated()),
            Some(json!({
                "route": app.route().path(),
                "authenticated": app.is_authenticated(),
                "redirected_from": app.redirected_from().map(|r| r.path()),
            })),
        )?,
        (_, "go") => match Route::from_path(rest.trim()) {
            Some(route) => {
                app.navigate(route).await;
                show_route(app, output_format)?;
            }
            None => output_error(output_format, &format!("Unknown location '{}'", rest.trim()), None)?,
        },

        // login page
        (Route::Login, "login") => {
            let (email, password) = split_login_args(rest);
            let email = match email {
                Some(email) => email.to_string(),
                None => input.prompt_with_default("Email", "").await?,
            };
            let password = match password {
                Some(password) => password.to_string(),
                None => input.prompt_secret("Password").await?,
            };

            app.login_form().set_draft(Credentials::new(email, password));
            let outcome = app.submit_login().await;
            if report_form_outcome(output_format, &outcome, "Logged in")? {
                show_route(app, output_format)?;
            }
        }
        (Route::Login, "signup") => {
            app.navigate(Route::Signup).await;
            show_route(app, output_format)?;
        }
        (Route::Login, "dismiss") => app.login_form().dismiss_error(),

        // signup page
        (Route::Signup, "register") => {
            let draft = prompt_registration(input, app.signup_form().draft()).await?;
            app.signup_form().set_draft(draft);
            let outcome = app.submit_signup().await;
            if report_form_outcome(output_format, &outcome, "User Registered")? {
                println!("{}", REGISTERED_MESSAGE);
                println!("Type 'ok' to continue to the login page.");
            }
        }
        (Route::Signup, "ok") if app.signup_form().confirmation_pending() => {
            app.acknowledge_registration().await;
            show_route(app, output_format)?;
        }
        (Route::Signup, "login") => {
            app.navigate(Route::Login).await;
            show_route(app, output_format)?;
        }
        (Route::Signup, "dismiss") => app.signup_form().dismiss_error(),

        // dashboard
        (Route::Dashboard, "list" | "ls") => render_dashboard(app, output_format)?,
        (Route::Dashboard, "reload") => {
            let result = app.categories().load().await;
            report_sync_result(app, output_format, &result, "Categories reloaded")?;
        }
        (Route::Dashboard, "name") => app.categories().set_name(rest.trim()),
        (Route::Dashboard, "desc" | "description") => app.categories().set_description(rest.trim()),
        (Route::Dashboard, "add" | "save") => {
            let editing = app.categories().is_editing();
            let result = app.categories().submit_draft().await;
            if editing {
                report_commit(app, output_format, &result)?;
            } else {
                report_sync_result(app, output_format, &result, "Category added")?;
            }
        }
        (Route::Dashboard, "edit") => match rest.trim().parse::<usize>() {
            Ok(position) => {
                // out-of-range positions are ignored
                app.categories().begin_edit(position);
                render_dashboard(app, output_format)?;
            }
            Err(_) => output_error(output_format, "usage: edit <position>", None)?,
        },
        (Route::Dashboard, "update") => {
            if !app.categories().is_editing() {
                output_error(output_format, "Nothing is being edited", None)?;
            } else {
                let result = app.categories().commit_edit().await;
                report_commit(app, output_format, &result)?;
            }
        }
        (Route::Dashboard, "cancel") => {
            app.categories().cancel_edit();
            render_dashboard(app, output_format)?;
        }
        (Route::Dashboard, "delete" | "rm") => match rest.trim().parse::<i64>() {
            Ok(id) => {
                let result = app.categories().delete(id).await;
                report_sync_result(app, output_format, &result, &format!("Category {} deleted", id))?;
            }
            Err(_) => output_error(output_format, "usage: delete <id>", None)?,
        },
        (Route::Dashboard, "logout") => {
            app.logout().await;
            show_route(app, output_format)?;
        }

        (route, other) => output_error(
            output_format,
            &format!("'{}' is not available at {} (type 'help')", other, route),
            None,
        )?,
    }

    Ok(Flow::Continue)
}

/// Split a shell line into the command word and the rest, which keeps its
/// trailing whitespace
fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line.trim_end(), ""),
    }
}

/// `<email> <password>`: the password is everything after the first separator
fn split_login_args(rest: &str) -> (Option<&str>, Option<&str>) {
    match rest.split_once(char::is_whitespace) {
        Some((email, password)) if !password.is_empty() => (Some(email), Some(password)),
        Some((email, _)) => (Some(email), None),
        None if rest.is_empty() => (None, None),
        None => (Some(rest), None),
    }
}

/// `Ok(None)` from an update means the record was deleted while it was in flight
fn report_commit(
    app: &App,
    output_format: &OutputFormat,
    result: &ClientResult<Option<Category>>,
) -> anyhow::Result<()> {
    if record_vanished(result) {
        output_error(output_format, "That category no longer exists", Some("NOT_FOUND"))?;
        return render_dashboard(app, output_format);
    }
    report_sync_result(app, output_format, result, "Category updated")
}

fn record_vanished(result: &ClientResult<Option<Category>>) -> bool {
    matches!(result, Ok(None))
}

fn show_route(app: &App, output_format: &OutputFormat) -> anyhow::Result<()> {
    match app.route() {
        Route::Dashboard => render_dashboard(app, output_format),
        Route::Login => {
            if let crate::forms::SubmissionStatus::Failed(message) = app.login_form().status() {
                output_error(output_format, &message, Some("LOGIN_FAILED"))?;
            }
            println!("Login - type 'login <email> <password>' or 'signup'");
            Ok(())
        }
        Route::Signup => {
            println!("Sign Up - type 'register' to fill in the form, or 'login'");
            Ok(())
        }
    }
}

async fn prompt_registration(input: &mut LineReader, mut draft: Registration) -> anyhow::Result<Registration> {
    draft.full_name = input.prompt_with_default("Full Name", &draft.full_name).await?;
    draft.email = input.prompt_with_default("Email", &draft.email).await?;
    draft.date_of_birth = input
        .prompt_with_default("Date of Birth (YYYY-MM-DD)", &draft.date_of_birth)
        .await?;
    draft.address.street = input.prompt_with_default("Address", &draft.address.street).await?;
    draft.address.city = input.prompt_with_default("City", &draft.address.city).await?;
    draft.address.state = input.prompt_with_default("State", &draft.address.state).await?;
    draft.address.zip_code = input.prompt_with_default("Post Code", &draft.address.zip_code).await?;
    // passwords are never shown back as a default
    draft.password = input.prompt_secret("Password").await?;
    Ok(draft)
}

fn print_help(route: Route) {
    println!("Commands at {}:", route);
    match route {
        Route::Login => {
            println!("  login <email> <password>   sign in");
            println!("  signup                     go to the registration form");
            println!("  dismiss                    close the error message");
        }
        Route::Signup => {
            println!("  register                   fill in and submit the registration form");
            println!("  ok                         close the confirmation and go to login");
            println!("  login                      go to the login page");
            println!("  dismiss                    close the error message");
        }
        Route::Dashboard => {
            println!("  list                       show categories and the draft");
            println!("  reload                     fetch categories from the server");
            println!("  name <text>                set the draft name");
            println!("  desc <text>                set the draft description");
            println!("  add                        add the draft (or update when editing)");
            println!("  edit <position>            load a category into the draft");
            println!("  update                     save the edited category");
            println!("  cancel                     abandon the current edit");
            println!("  delete <id>                delete a category");
            println!("  logout                     end the session");
        }
    }
    println!("  status | go <path> | help | quit");
}
