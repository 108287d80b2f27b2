//! Declaration walk: builds scopes, declares bindings and collects the
//! reference occurrences that resolution will bind.

use crate::scopes::{BindingFlags, BindingId, DeclKind, ExportKind, ScopeId, ScopeKind};
use crate::state::{BindError, BindErrorKind, BinderState, PendingReference};
use jsz_parser::{ClassData, FunctionData, NodeArena, NodeData, NodeIndex, VarKind, children};
use tracing::trace;

impl BinderState {
    pub(crate) fn declare_source_file(
        &mut self,
        arena: &NodeArena,
        root: NodeIndex,
    ) -> Result<(), BindError> {
        let Some(NodeData::SourceFile {
            statements,
            is_module,
        }) = arena.data(root)
        else {
            return Ok(());
        };
        self.options.is_module |= *is_module;

        self.push_scope(ScopeKind::TopLevel, root);
        self.label_stack.push(Vec::new());
        for &statement in statements {
            if self.options.is_module && is_module_item(arena, statement) {
                self.declare_module_item(arena, statement)?;
            } else {
                self.declare_node(arena, statement)?;
            }
        }
        self.label_stack.pop();
        self.check_nested_declarations(arena)
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    pub(crate) fn declare_node(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<(), BindError> {
        let Some(data) = arena.data(idx) else {
            return Ok(());
        };
        match data {
            NodeData::Identifier { .. } => self.add_reference(arena, idx, false),

            NodeData::VariableStatement { kind, declarations } => {
                self.declare_variable_list(arena, *kind, declarations, false)?;
            }

            NodeData::FunctionDeclaration(f) => {
                if f.name.is_some() {
                    let scope = self.current();
                    let binding = self.declare_in(arena, scope, f.name, DeclKind::Function)?;
                    self.mark_initialized(binding);
                }
                self.declare_function(arena, idx, f, false, None)?;
            }
            NodeData::FunctionExpression(f) => {
                self.declare_function(arena, idx, f, false, Some(DeclKind::FunctionName))?;
            }
            NodeData::ArrowFunction(f) => self.declare_function(arena, idx, f, true, None)?,

            NodeData::ClassDeclaration(c) => {
                if c.name.is_some() {
                    let scope = self.current();
                    let binding = self.declare_in(arena, scope, c.name, DeclKind::Class)?;
                    self.mark_initialized(binding);
                }
                self.declare_class(arena, idx, c, None)?;
            }
            NodeData::ClassExpression(c) => {
                self.declare_class(arena, idx, c, Some(DeclKind::ClassName))?;
            }

            NodeData::Block { statements } => {
                self.push_scope(ScopeKind::Block, idx);
                for &statement in statements {
                    self.declare_node(arena, statement)?;
                }
                self.pop_scope();
            }

            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                self.push_scope(ScopeKind::Block, idx);
                self.loop_nodes.push(idx);
                self.declare_node(arena, *init)?;
                self.declare_node(arena, *test)?;
                self.declare_node(arena, *update)?;
                self.declare_node(arena, *body)?;
                self.pop_scope();
            }
            NodeData::ForIn { left, right, body } | NodeData::ForOf { left, right, body, .. } => {
                self.push_scope(ScopeKind::Block, idx);
                self.loop_nodes.push(idx);
                if let Some(NodeData::VariableStatement { kind, declarations }) = arena.data(*left) {
                    self.declare_variable_list(arena, *kind, declarations, true)?;
                } else {
                    self.declare_write_target(arena, *left)?;
                }
                self.declare_node(arena, *right)?;
                self.declare_node(arena, *body)?;
                self.pop_scope();
            }

            NodeData::Switch {
                discriminant,
                cases,
            } => {
                self.declare_node(arena, *discriminant)?;
                self.push_scope(ScopeKind::Block, idx);
                for &case in cases {
                    self.declare_node(arena, case)?;
                }
                self.pop_scope();
            }

            NodeData::CatchClause { param, body } => {
                let scope = self.push_scope(ScopeKind::Block, idx);
                if param.is_some() {
                    self.declare_pattern(arena, *param, DeclKind::CatchParameter, scope, true)?;
                }
                if let Some(NodeData::Block { statements }) = arena.data(*body) {
                    self.node_scopes.insert(*body, scope);
                    for &statement in statements {
                        self.declare_node(arena, statement)?;
                    }
                }
                self.pop_scope();
            }

            NodeData::Labeled { label, body } => {
                let name = arena.name_text(*label).unwrap_or_default().to_string();
                let duplicate = self
                    .label_stack
                    .last()
                    .is_some_and(|frame| frame.contains(&name));
                if duplicate {
                    return Err(self.error_at(arena, *label, BindErrorKind::DuplicateLabel, &name));
                }
                if let Some(frame) = self.label_stack.last_mut() {
                    frame.push(name);
                }
                self.declare_node(arena, *body)?;
                if let Some(frame) = self.label_stack.last_mut() {
                    frame.pop();
                }
            }
            NodeData::Break { label } | NodeData::Continue { label } => {
                if label.is_some() {
                    let name = arena.name_text(*label).unwrap_or_default();
                    let known = self
                        .label_stack
                        .last()
                        .is_some_and(|frame| frame.iter().any(|l| l == name));
                    if !known {
                        return Err(self.error_at(arena, *label, BindErrorKind::UndefinedLabel, name));
                    }
                }
            }

            NodeData::With { object, body } => {
                self.declare_node(arena, *object)?;
                let scope = self.current();
                self.with_scopes.push(scope);
                self.declare_node(arena, *body)?;
            }

            NodeData::Assign { target, value, .. } => {
                self.declare_write_target(arena, *target)?;
                self.declare_node(arena, *value)?;
            }
            NodeData::Update { operand, .. } => {
                if matches!(arena.data(*operand), Some(NodeData::Identifier { .. })) {
                    self.add_reference(arena, *operand, true);
                } else {
                    self.declare_node(arena, *operand)?;
                }
            }
            NodeData::Call { callee, arguments, .. } => {
                if arena.identifier_name(*callee) == Some("eval") {
                    self.eval_calls.insert(*callee);
                }
                self.declare_node(arena, *callee)?;
                for &argument in arguments {
                    self.declare_node(arena, argument)?;
                }
            }

            NodeData::ImportDeclaration { .. } => {
                return Err(self.error_at(arena, idx, BindErrorKind::ModuleOnlyConstruct, "import"));
            }
            NodeData::ExportNamed { .. }
            | NodeData::ExportDefault { .. }
            | NodeData::ExportAll { .. } => {
                return Err(self.error_at(arena, idx, BindErrorKind::ModuleOnlyConstruct, "export"));
            }

            _ => {
                for child in children(arena, idx) {
                    self.declare_node(arena, child)?;
                }
            }
        }
        Ok(())
    }

    fn declare_variable_list(
        &mut self,
        arena: &NodeArena,
        kind: VarKind,
        declarations: &[NodeIndex],
        in_loop_head: bool,
    ) -> Result<(), BindError> {
        let (decl_kind, target) = match kind {
            VarKind::Var => (DeclKind::Var, self.scope(self.current()).defun),
            VarKind::Let => (DeclKind::Let, self.current()),
            VarKind::Const => (DeclKind::Const, self.current()),
        };
        for &declarator in declarations {
            let Some(NodeData::VariableDeclarator { name, init }) = arena.data(declarator) else {
                continue;
            };
            let initialized = init.is_some() || in_loop_head;
            self.declare_pattern(arena, *name, decl_kind, target, initialized)?;
            self.declare_node(arena, *init)?;
        }
        Ok(())
    }

    fn declare_function(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        f: &FunctionData,
        is_arrow: bool,
        name_kind: Option<DeclKind>,
    ) -> Result<(), BindError> {
        let export = std::mem::take(&mut self.pending_export);
        let scope = self.push_scope(ScopeKind::Function, idx);
        self.scope_mut(scope).is_arrow = is_arrow;
        self.label_stack.push(Vec::new());

        if let Some(kind) = name_kind
            && f.name.is_some()
        {
            let binding = self.declare_in(arena, scope, f.name, kind)?;
            self.mark_initialized(binding);
        }
        for &param in &f.params {
            self.declare_pattern(arena, param, DeclKind::Parameter, scope, false)?;
        }
        if f.expression_body {
            self.declare_node(arena, f.body)?;
        } else if let Some(NodeData::Block { statements }) = arena.data(f.body) {
            self.node_scopes.insert(f.body, scope);
            for &statement in statements {
                self.declare_node(arena, statement)?;
            }
        }

        self.label_stack.pop();
        self.pop_scope();
        self.pending_export = export;
        Ok(())
    }

    fn declare_class(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        c: &ClassData,
        name_kind: Option<DeclKind>,
    ) -> Result<(), BindError> {
        let export = std::mem::take(&mut self.pending_export);
        let scope = self.push_scope(ScopeKind::Block, idx);
        if let Some(kind) = name_kind
            && c.name.is_some()
        {
            let binding = self.declare_in(arena, scope, c.name, kind)?;
            self.mark_initialized(binding);
        }
        self.declare_node(arena, c.extends)?;

        for &member in &c.members {
            match arena.data(member) {
                Some(
                    NodeData::MethodDefinition {
                        key,
                        value,
                        computed,
                        ..
                    }
                    | NodeData::PropertyDefinition {
                        key,
                        value,
                        computed,
                        ..
                    },
                ) => {
                    if *computed {
                        self.declare_node(arena, *key)?;
                    }
                    self.declare_node(arena, *value)?;
                }
                Some(NodeData::StaticBlock { body }) => {
                    self.push_scope(ScopeKind::Function, member);
                    self.label_stack.push(Vec::new());
                    for &statement in body {
                        self.declare_node(arena, statement)?;
                    }
                    self.label_stack.pop();
                    self.pop_scope();
                }
                _ => self.declare_node(arena, member)?,
            }
        }

        self.pop_scope();
        self.pending_export = export;
        Ok(())
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn declare_module_item(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<(), BindError> {
        let root = self.root_scope();
        match arena.data(idx) {
            Some(NodeData::ImportDeclaration { specifiers, .. }) => {
                for &specifier in specifiers {
                    if let Some(
                        NodeData::ImportSpecifier { local, .. }
                        | NodeData::ImportDefaultSpecifier { local }
                        | NodeData::ImportNamespaceSpecifier { local },
                    ) = arena.data(specifier)
                    {
                        let binding = self.declare_in(arena, root, *local, DeclKind::Import)?;
                        self.mark_initialized(binding);
                    }
                }
            }
            Some(NodeData::ExportNamed {
                declaration,
                specifiers,
                source,
            }) => {
                if declaration.is_some() {
                    self.pending_export = ExportKind::NoMangle;
                    let result = self.declare_node(arena, *declaration);
                    self.pending_export = ExportKind::None;
                    result?;
                }
                if source.is_none() {
                    for &specifier in specifiers {
                        if let Some(NodeData::ExportSpecifier { local, .. }) = arena.data(specifier)
                            && matches!(arena.data(*local), Some(NodeData::Identifier { .. }))
                        {
                            self.add_reference(arena, *local, false);
                            self.export_references.push(*local);
                        }
                    }
                }
            }
            Some(NodeData::ExportDefault { declaration }) => {
                let named_declaration = match arena.data(*declaration) {
                    Some(NodeData::FunctionDeclaration(f)) => f.name.is_some(),
                    Some(NodeData::ClassDeclaration(c)) => c.name.is_some(),
                    _ => false,
                };
                if named_declaration {
                    self.pending_export = ExportKind::WantMangle;
                }
                let result = self.declare_node(arena, *declaration);
                self.pending_export = ExportKind::None;
                result?;
            }
            _ => {}
        }
        Ok(())
    }

    // =========================================================================
    // Patterns and targets
    // =========================================================================

    fn declare_pattern(
        &mut self,
        arena: &NodeArena,
        pattern: NodeIndex,
        kind: DeclKind,
        target: ScopeId,
        initialized: bool,
    ) -> Result<(), BindError> {
        match arena.data(pattern) {
            Some(NodeData::Identifier { name }) => {
                if name.is_empty() {
                    return Ok(());
                }
                let binding = self.declare_in(arena, target, pattern, kind)?;
                if initialized {
                    self.mark_initialized(binding);
                }
            }
            Some(NodeData::AssignmentPattern {
                target: inner,
                default,
            }) => {
                self.declare_pattern(arena, *inner, kind, target, true)?;
                self.declare_node(arena, *default)?;
            }
            Some(NodeData::ArrayPattern { elements }) => {
                for &element in elements {
                    if element.is_some() {
                        self.declare_pattern(arena, element, kind, target, initialized)?;
                    }
                }
            }
            Some(NodeData::ObjectPattern { properties }) => {
                for &property in properties {
                    match arena.data(property) {
                        Some(NodeData::Property {
                            key,
                            value,
                            computed,
                            ..
                        }) => {
                            if *computed {
                                self.declare_node(arena, *key)?;
                            }
                            self.declare_pattern(arena, *value, kind, target, initialized)?;
                        }
                        _ => self.declare_pattern(arena, property, kind, target, initialized)?,
                    }
                }
            }
            Some(NodeData::Rest { argument }) => {
                self.declare_pattern(arena, *argument, kind, target, initialized)?;
            }
            _ => self.declare_node(arena, pattern)?,
        }
        Ok(())
    }

    fn declare_write_target(&mut self, arena: &NodeArena, target: NodeIndex) -> Result<(), BindError> {
        match arena.data(target) {
            Some(NodeData::Identifier { .. }) => self.add_reference(arena, target, true),
            Some(NodeData::AssignmentPattern {
                target: inner,
                default,
            }) => {
                self.declare_write_target(arena, *inner)?;
                self.declare_node(arena, *default)?;
            }
            Some(NodeData::ArrayPattern { elements }) => {
                for &element in elements {
                    self.declare_write_target(arena, element)?;
                }
            }
            Some(NodeData::ObjectPattern { properties }) => {
                for &property in properties {
                    match arena.data(property) {
                        Some(NodeData::Property {
                            key,
                            value,
                            computed,
                            ..
                        }) => {
                            if *computed {
                                self.declare_node(arena, *key)?;
                            }
                            self.declare_write_target(arena, *value)?;
                        }
                        _ => self.declare_write_target(arena, property)?,
                    }
                }
            }
            Some(NodeData::Rest { argument }) => self.declare_write_target(arena, *argument)?,
            _ => self.declare_node(arena, target)?,
        }
        Ok(())
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Declare the identifier `ident` in `scope`, reusing a compatible
    /// existing binding.
    fn declare_in(
        &mut self,
        arena: &NodeArena,
        scope: ScopeId,
        ident: NodeIndex,
        kind: DeclKind,
    ) -> Result<BindingId, BindError> {
        let name = arena.identifier_name(ident).unwrap_or_default().to_string();
        if kind == DeclKind::Var && scope != self.current() {
            self.nested_declarations.push((ident, self.current()));
        }

        let existing = self.scope(scope).names.get(&name).copied();
        let binding = match existing {
            Some(existing) if !shadows(self.binding(existing).kind) => {
                if conflicts(self.binding(existing).kind, kind) {
                    return Err(self.error_at(arena, ident, BindErrorKind::Redeclaration, &name));
                }
                let export = self.pending_export;
                let binding = self.binding_mut(existing);
                binding.flags |= BindingFlags::REDECLARED;
                if export != ExportKind::None {
                    binding.export = export;
                }
                existing
            }
            _ => {
                let export = self.pending_export;
                let id = self.new_binding(&name, scope, kind);
                self.binding_mut(id).export = export;
                self.scope_mut(scope).names.insert(name.clone(), id);
                id
            }
        };

        if kind == DeclKind::Function {
            self.scope_mut(scope).functions.insert(name.clone(), binding);
        }
        self.binding_mut(binding).orig.push(ident);
        self.node_bindings.insert(ident, binding);
        trace!(name = %name, ?kind, scope = scope.0, "declared");
        Ok(binding)
    }

    fn mark_initialized(&mut self, binding: BindingId) {
        let binding = self.binding_mut(binding);
        binding.assignments += 1;
        binding.flags |= BindingFlags::INITIALIZED;
    }

    fn add_reference(&mut self, arena: &NodeArena, node: NodeIndex, is_write: bool) {
        if arena.identifier_name(node).is_none_or(str::is_empty) {
            return;
        }
        self.pending_references.push(PendingReference {
            node,
            scope: self.current(),
            is_write,
        });
    }

    /// A `var` nested in blocks must not cross a lexical declaration of the
    /// same name on its way to the function scope.
    fn check_nested_declarations(&mut self, arena: &NodeArena) -> Result<(), BindError> {
        let nested = std::mem::take(&mut self.nested_declarations);
        for &(ident, scope) in &nested {
            let name = arena.identifier_name(ident).unwrap_or_default();
            let defun = self.scope(scope).defun;
            for s in self.scope_chain(scope) {
                if s == defun {
                    break;
                }
                if let Some(&binding) = self.scope(s).names.get(name) {
                    let kind = self.binding(binding).kind;
                    if kind.is_lexical() || matches!(kind, DeclKind::Function | DeclKind::Import) {
                        return Err(self.error_at(arena, ident, BindErrorKind::Redeclaration, name));
                    }
                }
            }
        }
        self.nested_declarations = nested;
        Ok(())
    }
}

fn is_module_item(arena: &NodeArena, idx: NodeIndex) -> bool {
    matches!(
        arena.data(idx),
        Some(
            NodeData::ImportDeclaration { .. }
                | NodeData::ExportNamed { .. }
                | NodeData::ExportDefault { .. }
                | NodeData::ExportAll { .. }
        )
    )
}

/// Kinds a same-scope declaration replaces instead of joining.
fn shadows(existing: DeclKind) -> bool {
    matches!(
        existing,
        DeclKind::FunctionName | DeclKind::ClassName | DeclKind::Arguments | DeclKind::Global
    )
}

fn conflicts(existing: DeclKind, new: DeclKind) -> bool {
    if existing == DeclKind::Import || new == DeclKind::Import {
        return true;
    }
    if existing.is_lexical() || new.is_lexical() {
        return true;
    }
    match (existing, new) {
        (DeclKind::CatchParameter, DeclKind::CatchParameter | DeclKind::Function)
        | (DeclKind::Function, DeclKind::CatchParameter) => true,
        _ => false,
    }
}
