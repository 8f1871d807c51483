use log::{debug, error, info};

use crate::config::Config;
use crate::version::{fetch_server_version, LocalVersion, RemoteVersion};

const DOCS_URL: &str = "https://docs.meshery.io";

/// Run the version command - report client and server build information.
///
/// Never fails: any problem talking to the server is logged and the
/// server fields are reported as unavailable. Returns what was reported.
pub async fn run(config: &Config, local: &LocalVersion) -> RemoteVersion {
    info!(
        "Client Version: {} \t  GitSHA: {}",
        local.build, local.commit_sha
    );

    let base_url = config.base_service_url();
    let client = reqwest::Client::new();

    match fetch_server_version(&client, &base_url).await {
        Ok(remote) => {
            report_server(&remote);
            remote
        }
        Err(e) => {
            debug!("{}", e);
            let remote = RemoteVersion::unavailable();
            report_server(&remote);
            error!("Could not communicate with Meshery at {}", e.url());
            error!(
                "Ensure that Meshery is available. See Meshery Documentation ({}) for help.",
                DOCS_URL
            );
            remote
        }
    }
}

fn report_server(remote: &RemoteVersion) {
    info!(
        "Server Version: {} \t  GitSHA: {}",
        remote.build, remote.commit_sha
    );
}
