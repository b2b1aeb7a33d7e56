use itertools::Itertools;

use media_tidy::organize::{
    DEFAULT_LOOKUP_TIMEOUT, DEFAULT_LOOKUP_URL, DEFAULT_SUBTITLE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS, MediaTidyConfig,
    OrganizeConfig, normalize_extensions,
};

use crate::Args;

/// Create config from given command line args and user config file.
///
/// # Errors
/// Returns an error if the config file cannot be read or parsed,
/// or the library root does not exist.
pub fn from_args(args: Args) -> anyhow::Result<OrganizeConfig> {
    let user_config = MediaTidyConfig::get_user_config()?;
    merge(args, user_config)
}

/// Combine CLI args with the user config: flags are OR-ed, extension lists are chained.
fn merge(args: Args, user_config: MediaTidyConfig) -> anyhow::Result<OrganizeConfig> {
    let root = media_tidy::resolve_input_path(args.path.as_deref().or(user_config.root.as_deref()))?;

    let video_extensions = merge_extensions(DEFAULT_VIDEO_EXTENSIONS, user_config.video_extensions, args.video_ext);
    let subtitle_extensions =
        merge_extensions(DEFAULT_SUBTITLE_EXTENSIONS, user_config.subtitle_extensions, args.subtitle_ext);

    Ok(OrganizeConfig {
        auto: args.auto || user_config.auto,
        debug: args.debug || user_config.debug,
        dryrun: args.print || user_config.dryrun,
        log_file: args.log.or(user_config.log_file),
        lookup_timeout: args
            .timeout
            .or(user_config.lookup_timeout)
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT),
        lookup_url: user_config
            .lookup_url
            .unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string()),
        match_folders: args.match_folders || user_config.match_folders,
        offline: args.offline || user_config.offline,
        overwrite: args.force || user_config.overwrite,
        reveal: args.reveal || user_config.reveal,
        root,
        subtitle_extensions,
        trash: args.trash || user_config.trash,
        verbose: args.verbose || user_config.verbose,
        video_extensions,
    })
}

/// Config file list replaces the defaults, CLI values are appended.
fn merge_extensions(defaults: &[&str], from_config: Vec<String>, from_args: Vec<String>) -> Vec<String> {
    let base: Vec<String> = if from_config.is_empty() {
        defaults.iter().map(ToString::to_string).collect()
    } else {
        from_config
    };
    let combined = base.into_iter().chain(from_args).unique().collect_vec();
    normalize_extensions(&combined)
}
