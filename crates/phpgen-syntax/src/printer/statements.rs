use super::Printer;
use crate::ast::{Block, Class, ForEach, Function, If, Node, While};
use crate::error::SyntaxError;

impl Printer {
    // =========================================================================
    // Blocks
    // =========================================================================

    /// `{ a; b; }`, or `{}` for an absent or empty block.
    pub(super) fn emit_block(&mut self, block: Option<&Block>) -> Result<(), SyntaxError> {
        let Some(block) = block.filter(|b| !b.is_empty()) else {
            self.write("{}");
            return Ok(());
        };
        self.write("{ ");
        for (i, statement) in block.statements.iter().enumerate() {
            if i > 0 {
                self.write_char(' ');
            }
            self.emit(statement)?;
            self.write_char(';');
        }
        self.write(" }");
        Ok(())
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub(super) fn emit_function(&mut self, function: &Function) -> Result<(), SyntaxError> {
        self.write("function");
        if let Some(name) = &function.name {
            self.write_char(' ');
            self.write(name.as_str());
        }
        self.write_char('(');
        for (i, parameter) in function.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_variable(parameter);
        }
        self.write(") ");
        self.emit_block(function.body.as_ref())
    }

    pub(super) fn emit_class(&mut self, class: &Class) -> Result<(), SyntaxError> {
        self.write("class ");
        self.write(class.name.as_str());
        if let Some(parent) = &class.parent {
            self.write(" extends ");
            self.write(parent.as_str());
        }
        if class.members.is_empty() {
            self.write(" {}");
            return Ok(());
        }
        self.write(" {");
        for member in &class.members {
            self.write_char(' ');
            self.emit_function(member)?;
        }
        self.write(" }");
        Ok(())
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    pub(super) fn emit_if(&mut self, stmt: &If) -> Result<(), SyntaxError> {
        self.write("if (");
        self.emit(&stmt.condition)?;
        self.write(") ");
        self.emit_block(stmt.then_branch.as_ref())?;
        if let Some(else_branch) = &stmt.else_branch {
            self.write(" else ");
            self.emit_block(Some(else_branch))?;
        }
        Ok(())
    }

    pub(super) fn emit_return(&mut self, value: Option<&Node>) -> Result<(), SyntaxError> {
        self.write("return");
        if let Some(value) = value {
            self.write_char(' ');
            self.emit(value)?;
        }
        Ok(())
    }

    pub(super) fn emit_while(&mut self, stmt: &While) -> Result<(), SyntaxError> {
        self.write("while (");
        self.emit(&stmt.condition)?;
        self.write(") ");
        self.emit_block(Some(&stmt.body))
    }

    pub(super) fn emit_foreach(&mut self, stmt: &ForEach) -> Result<(), SyntaxError> {
        self.write("foreach (");
        self.emit(&stmt.iterable)?;
        self.write(" as ");
        if let Some(key) = &stmt.key {
            self.emit_variable(key);
            self.write(" => ");
        }
        self.emit_variable(&stmt.value);
        self.write(") ");
        self.emit_block(Some(&stmt.body))
    }
}
