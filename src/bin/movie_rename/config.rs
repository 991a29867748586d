use movie_rename::movie_name::{MovieRenameConfig, MovieRenameUserConfig};

use crate::Args;

/// Create config from given command line args, user config file and environment.
///
/// # Errors
/// Returns an error if the API key is missing,
/// or if the config file cannot be read or parsed.
pub fn from_args(args: Args) -> anyhow::Result<MovieRenameConfig> {
    let api_key = MovieRenameConfig::api_key_from_env()?;
    let user_config = MovieRenameUserConfig::get_user_config()?;
    merge(args, api_key, user_config)
}

/// Combine args with the user config, args taking precedence.
fn merge(args: Args, api_key: String, user_config: MovieRenameUserConfig) -> anyhow::Result<MovieRenameConfig> {
    let mut config = MovieRenameConfig::from_user_config(api_key, user_config)?;
    if let Some(dryrun) = args.dryrun {
        config.dryrun = dryrun;
    }
    config.noop |= args.noop;
    config.verbose |= args.verbose;
    config.skip_confirmation = args.yes;
    Ok(config)
}
