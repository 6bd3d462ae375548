use rand::Rng;
use rand::distr::Alphanumeric;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_reset_password(
    config: &Config,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username(username).await?.is_none() {
        println!("No account named '{username}'.");
        return Ok(());
    }

    let generated = password.is_none();
    let password = password.unwrap_or_else(|| {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(16)
            .map(char::from)
            .collect()
    });

    store
        .update_user_password(username, &password, Some(&config.security))
        .await?;

    if generated {
        println!("✓ Password for '{username}' reset to: {password}");
        println!("  Store it somewhere safe, it will not be shown again.");
    } else {
        println!("✓ Password for '{username}' updated.");
    }

    Ok(())
}
