use anyhow::{Context, Result};

/// Credentials for the usage endpoint, read from the process environment.
#[derive(Debug, Clone)]
pub struct OpenAiCredentials {
    pub api_key: String,
    pub organization: String,
}

pub fn read_openai_credentials() -> Result<OpenAiCredentials> {
    let api_key =
        std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY env var not set")?;
    if api_key.is_empty() {
        anyhow::bail!("OPENAI_API_KEY is empty");
    }

    let organization = std::env::var("OPENAI_ORGANIZATION")
        .context("OPENAI_ORGANIZATION env var not set")?;
    if organization.is_empty() {
        anyhow::bail!("OPENAI_ORGANIZATION is empty");
    }

    Ok(OpenAiCredentials {
        api_key,
        organization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so the scenarios run in one test to
    // avoid interleaving with parallel test threads.
    #[test]
    fn credentials_from_env() {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("OPENAI_ORGANIZATION", "org-test");
        let creds = read_openai_credentials().unwrap();
        assert_eq!(creds.api_key, "sk-test");
        assert_eq!(creds.organization, "org-test");

        std::env::set_var("OPENAI_API_KEY", "");
        let err = read_openai_credentials().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY is empty"));

        std::env::remove_var("OPENAI_API_KEY");
        let err = read_openai_credentials().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        std::env::remove_var("OPENAI_ORGANIZATION");
    }
}
