/// Joins a base URL and a remote file name with exactly one separator.
pub fn join_url(base: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        file_name.trim_start_matches('/')
    )
}

/// Builds the absolute remote path for a file under the initial path.
pub fn remote_path(initial_path: &str, file_name: &str) -> String {
    let dir = initial_path.trim_matches('/');
    let name = file_name.trim_start_matches('/');
    if dir.is_empty() {
        format!("/{}", name)
    } else {
        format!("/{}/{}", dir, name)
    }
}

/// Builds the local target path `{local_path}/{file_name}` with exactly
/// one separator.
pub fn local_target(local_path: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        local_path.trim_end_matches('/'),
        file_name.trim_start_matches('/')
    )
}

/// Splits a raw NLST payload into file names, one per line. Trailing
/// whitespace is trimmed first so an empty listing yields an empty vector.
pub fn split_listing(raw: &str) -> Vec<String> {
    raw.trim_end()
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
