//! Bundled interactions runnable from the command line.

use anyhow::{bail, Context as _, Result};
use interactor_core::{
    Context, Engine, ErrorCollection, Errorable, Filter, InputSet, Inputs, Interaction, Plain,
    ReturningInteraction, Schema, Step, Unit, Validator,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as Json};

/// Name and summary of a bundled interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoInfo {
    pub name: &'static str,
    pub returning: Option<&'static str>,
    pub summary: &'static str,
}

pub const DEMOS: &[DemoInfo] = &[
    DemoInfo {
        name: "update-account",
        returning: UpdateAccount::RETURNING,
        summary: "Update an account's email and display name, welcoming newsletter subscribers",
    },
    DemoInfo {
        name: "send-welcome",
        returning: None,
        summary: "Queue a welcome mail for an email address",
    },
];

/// What a demo run produced.
#[derive(Debug)]
pub struct Report {
    pub output: Json,
    pub errors: ErrorCollection,
}

/// Run the bundled interaction called `name` with JSON object inputs.
pub fn run_demo(engine: &Engine, name: &str, mut inputs: Map<String, Json>) -> Result<Report> {
    match name {
        "update-account" => {
            let mut account = match inputs.remove("account") {
                Some(Json::Null) | None => Account::default(),
                Some(raw) => serde_json::from_value(raw).context("invalid `account` object")?,
            };
            let account = engine.run_returning(
                UpdateAccount,
                Inputs::from_map(inputs).with_record("account", &mut account),
            )?;
            Ok(Report {
                output: json!({ "account": &*account }),
                errors: account.errors().clone(),
            })
        }
        "send-welcome" => {
            let (errors, result) = engine
                .run(SendWelcome, Inputs::from_map(inputs))?
                .into_parts();
            Ok(Report {
                output: json!({ "result": result }),
                errors,
            })
        }
        other => bail!("unknown interaction `{other}`; see `interactor list`"),
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub newsletter: bool,
    pub welcomed: bool,
    #[serde(skip)]
    errors: ErrorCollection,
}

impl Errorable for Account {
    fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }
}

pub struct UpdateAccount;

impl Unit for UpdateAccount {
    fn name(&self) -> &'static str {
        "UpdateAccount"
    }

    fn filters(&self) -> Schema {
        Schema::new()
            .filter(Filter::record::<Account>("account"))
            .filter(Filter::string("email").presence())
            .filter(
                Filter::string("display_name")
                    .optional()
                    .validate(Validator::length(Some(2), Some(40))),
            )
            .filter(Filter::boolean("newsletter").default(false))
    }

    fn validate(&self, inputs: &InputSet<'_>, errors: &mut ErrorCollection) {
        if let Some(email) = inputs.string("email") {
            if !email.contains('@') {
                errors.add("email", "is invalid");
            }
        }
    }
}

impl ReturningInteraction for UpdateAccount {
    type Record = Account;
    const RETURNING: Option<&'static str> = Some("account");

    fn execute_returning(&mut self, ctx: &mut Context<'_>, account: &mut Account) -> Step {
        account.email = ctx.inputs().string("email").map(str::to_string);
        if let Some(name) = ctx.inputs().string("display_name") {
            account.display_name = Some(name.to_string());
        }
        account.newsletter = ctx.inputs().boolean("newsletter").unwrap_or_default();

        if account.newsletter && !account.welcomed {
            let inputs = Inputs::new().with("email", account.email.clone());
            let queued = ctx.compose(Plain(SendWelcome), inputs)?;
            tracing::info!(%queued, "welcome mail queued");
            account.welcomed = true;
        }
        Ok(())
    }

    fn on_invalid(&mut self, account: &mut Account, inputs: &InputSet<'_>) {
        if let Some(name) = inputs.string("display_name") {
            account.display_name = Some(name.to_string());
        }
    }
}

pub struct SendWelcome;

/// Addresses that never accept mail.
const UNDELIVERABLE_DOMAIN: &str = "@example.invalid";

impl Unit for SendWelcome {
    fn name(&self) -> &'static str {
        "SendWelcome"
    }

    fn filters(&self) -> Schema {
        Schema::new().filter(Filter::string("email").presence())
    }
}

impl Interaction for SendWelcome {
    type Output = String;

    fn execute(&mut self, ctx: &mut Context<'_>) -> Step<String> {
        let email = ctx.inputs().string("email").unwrap_or_default().to_string();
        if email.ends_with(UNDELIVERABLE_DOMAIN) {
            ctx.add_error("email", "cannot receive mail");
        }
        ctx.return_if_errors()?;
        Ok(format!("welcome mail for {email}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_update_account_success() {
        let report = run_demo(
            &Engine::default(),
            "update-account",
            object(json!({"email": "ada@example.com", "display_name": "Ada"})),
        )
        .unwrap();

        assert!(report.errors.is_empty(), "{}", report.errors);
        assert_eq!(report.output["account"]["email"], "ada@example.com");
        assert_eq!(report.output["account"]["welcomed"], false);
    }

    #[test]
    fn test_update_account_welcomes_subscribers() {
        let report = run_demo(
            &Engine::default(),
            "update-account",
            object(json!({"email": "ada@example.com", "newsletter": "on"})),
        )
        .unwrap();

        assert!(report.errors.is_empty(), "{}", report.errors);
        assert_eq!(report.output["account"]["welcomed"], true);
    }

    #[test]
    fn test_update_account_invalid_inputs() {
        let report = run_demo(
            &Engine::default(),
            "update-account",
            object(json!({"email": "not-an-address", "display_name": "A"})),
        )
        .unwrap();

        assert_eq!(report.errors.on("email"), vec!["is invalid"]);
        assert_eq!(
            report.errors.on("display_name"),
            vec!["is too short (minimum is 2 characters)"]
        );
        assert_eq!(report.output["account"]["email"], Json::Null);
    }

    #[test]
    fn test_update_account_keeps_accepted_inputs_on_invalid() {
        let report = run_demo(
            &Engine::default(),
            "update-account",
            object(json!({"email": "", "display_name": "Ada"})),
        )
        .unwrap();

        assert_eq!(report.errors.on("email"), vec!["can't be blank"]);
        assert_eq!(report.output["account"]["display_name"], "Ada");
    }

    #[test]
    fn test_undeliverable_welcome_fails_the_update() {
        let report = run_demo(
            &Engine::default(),
            "update-account",
            object(json!({
                "account": {"display_name": "Bob"},
                "email": "bob@example.invalid",
                "newsletter": true,
            })),
        )
        .unwrap();

        assert_eq!(report.errors.on("email"), vec!["cannot receive mail"]);
        assert_eq!(report.output["account"]["welcomed"], false);
        assert_eq!(report.output["account"]["display_name"], "Bob");
    }

    #[test]
    fn test_send_welcome() {
        let report = run_demo(
            &Engine::default(),
            "send-welcome",
            object(json!({"email": "ada@example.com"})),
        )
        .unwrap();

        assert!(report.errors.is_empty());
        assert_eq!(report.output["result"], "welcome mail for ada@example.com");
    }

    #[test]
    fn test_unknown_demo() {
        let err = run_demo(&Engine::default(), "missing", Map::new()).unwrap_err();
        assert!(err.to_string().contains("unknown interaction"));
    }

    #[test]
    fn test_demo_registry_names_returning_filter() {
        let update = DEMOS.iter().find(|demo| demo.name == "update-account").unwrap();
        assert_eq!(update.returning, Some("account"));
    }
}
