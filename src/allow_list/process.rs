use console::style;

use crate::{allow_list::AllowListRegistry, common::*, utils::print_with_style};

pub struct AllowListRootArgs {
    pub allow_list: String,
    pub label: Option<String>,
}

pub struct AllowListProofArgs {
    pub allow_list: String,
    pub label: String,
    pub address: String,
}

/// Prints the merkle root of one allow list, or of every list in the file.
pub fn process_allow_list_root(args: AllowListRootArgs) -> Result<()> {
    println!(
        "{} {}Computing allow list merkle roots",
        style("[1/1]").bold().dim(),
        KEY_EMOJI
    );

    let registry = AllowListRegistry::load(&args.allow_list)?;

    let labels: Vec<String> = match args.label {
        Some(label) => {
            if !registry.has(&label) {
                return Err(GuardError::MissingAllowList(label).into());
            }
            vec![label]
        }
        None => registry.labels().map(String::from).collect(),
    };

    if labels.is_empty() {
        println!("\n{}", style("No allow lists defined.").dim());
        return Ok(());
    }

    println!();
    for label in labels {
        let root = registry
            .merkle_root(&label)
            .map(hex::encode)
            .unwrap_or_else(|| "none (empty list)".to_string());
        info!("Allow list '{}' merkle root: {}", label, root);
        print_with_style("", &label, root);
    }

    Ok(())
}

/// Prints the merkle proof of `address` in the allow list `label`.
pub fn process_allow_list_proof(args: AllowListProofArgs) -> Result<()> {
    let registry = AllowListRegistry::load(&args.allow_list)?;

    let address = Pubkey::from_str(&args.address)
        .map_err(|_| anyhow!("Failed to parse address: {}", args.address))?;

    if !registry.has(&args.label) {
        return Err(GuardError::MissingAllowList(args.label).into());
    }

    let proof = registry
        .merkle_proof(&args.label, &address)
        .ok_or_else(|| GuardError::NotAllowListed(args.label.clone(), address))?;

    println!(
        "\n{}{} {}",
        KEY_EMOJI,
        style("Merkle proof for").dim(),
        address
    );
    print_with_style("", "allow list", &args.label);
    if let Some(root) = registry.merkle_root(&args.label) {
        print_with_style("", "root", hex::encode(root));
    }
    for (index, node) in proof.iter().enumerate() {
        print_with_style("    ", &index.to_string(), hex::encode(node));
    }

    Ok(())
}
