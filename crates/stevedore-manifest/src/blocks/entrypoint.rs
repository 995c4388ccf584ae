//! ENTRYPOINT: ports, privilege drop, and process entrypoint.

use stevedore_common::error::Result;

use crate::composer::BlockScope;
use crate::instruction::Instruction;
use crate::shell::ShellCommand;

/// Renders the ENTRYPOINT block.
///
/// # Errors
///
/// Never fails; the signature matches [`crate::block::BlockFn`].
pub fn render(scope: &BlockScope<'_>) -> Result<Vec<Instruction>> {
    let ctx = scope.ctx;
    let script = &scope.paths.entrypoint;
    Ok(vec![
        Instruction::Expose(ctx.port),
        Instruction::Expose(ctx.metrics_port),
        Instruction::run(ShellCommand::new("chmod +x").arg(script)),
        Instruction::User(ctx.user.clone()),
        Instruction::Entrypoint(vec![script.clone()]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::fixture;

    #[test]
    fn declares_ports_then_drops_privileges() {
        let lines = fixture::render_lines(&fixture::spec(), render);
        assert_eq!(
            lines,
            vec![
                "EXPOSE 3000",
                "EXPOSE 3001",
                "RUN chmod +x /home/bento/bento/env/docker/entrypoint.sh",
                "USER bento",
                r#"ENTRYPOINT ["/home/bento/bento/env/docker/entrypoint.sh"]"#,
            ]
        );
    }

    #[test]
    fn metrics_port_is_configurable() {
        let mut spec = fixture::spec();
        spec.metrics_port = Some(9464);
        let lines = fixture::render_lines(&spec, render);
        assert_eq!(lines[1], "EXPOSE 9464");
    }
}
