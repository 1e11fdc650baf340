use vergen_gitcl::{Emitter, GitclBuilder};

// `--version` prints the branch and commit, with a marker for uncommitted changes.
fn main() -> anyhow::Result<()> {
    let git = GitclBuilder::default()
        .branch(true)
        .sha(true)
        .dirty(false)
        .build()?;

    Emitter::default().add_instructions(&git)?.emit()?;
    Ok(())
}
