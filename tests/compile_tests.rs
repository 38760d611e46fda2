//! コンパイラ全体の結合テスト
//!
//! 移行元ツールが出力していた app-routing.module.ts と同じ文字列になることと、
//! ルートの並び順・ガードの付与範囲に関する性質を確認する。

use pretty_assertions::assert_eq;
use skyux_route_compiler::emitter::ImportKind;
use skyux_route_compiler::guards::GuardSource;
use skyux_route_compiler::model::{NodeKind, PathMatch, RedirectRule, RouteNode};
use skyux_route_compiler::{CompileError, CompileInput, compile};

const APP_GUARD: &str = r#"@Injectable({
  providedIn: 'root'
})
export class AppRouteGuard implements CanActivate {
  public canActivate(): Promise<boolean> {
    return Promise.resolve(false);
  }
  public canActivateChild() {}
  public canDeactivate() {}
}"#;

const USERS_GUARD: &str = r#"@Injectable()
export class MyRouteGuard implements CanActivate {
  public canActivate(): Promise<boolean> {
    return Promise.resolve(false);
  }
  public canActivateChild() {}
  public canDeactivate() {}
}"#;

fn input(pages: &[&str]) -> CompileInput {
    CompileInput {
        page_paths: pages.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}

fn root_group(tree: &RouteNode) -> &RouteNode {
    tree.children
        .iter()
        .find(|n| n.kind == NodeKind::Group)
        .expect("root group")
}

fn paths(node: &RouteNode) -> Vec<&str> {
    node.children.iter().map(|n| n.path_segment.as_str()).collect()
}

#[test]
fn migrates_spa_without_routes() {
    let compiled = compile(&CompileInput::default()).unwrap();

    assert_eq!(
        compiled.routing_module(),
        r#"import {
  NgModule
} from '@angular/core';

import {
  RouterModule,
  Routes
} from '@angular/router';

import {
  RootRouteIndexComponent
} from './index.component';

import {
  NotFoundComponent
} from './not-found.component';

const routes: Routes = [
  { path: '', children: [
    { path: '', component: RootRouteIndexComponent }
  ] },
  { path: '**', component: NotFoundComponent }
];

@NgModule({
  imports: [RouterModule.forRoot(routes)],
  exports: [RouterModule],
  providers: []
})
export class AppRoutingModule { }
"#
    );
}

#[test]
fn migrates_complex_routes() {
    let compiled = compile(&CompileInput {
        page_paths: vec![
            "about/#contact/#contributors/index.html".into(),
            "about/#contact/#form/index.html".into(),
            "about/#contact/#form/#foobar/index.html".into(),
            "about/#contact/index.html".into(),
            "about/careers/index.html".into(),
            "about/index.html".into(),
            "users/_userId/index.html".into(),
            "users/_userId/locations/_locationId/index.html".into(),
            "users/_userId/locations/index.html".into(),
            "users/foobar/index.html".into(),
            "users/index.html".into(),
        ],
        guard_sources: vec![
            GuardSource::new("index.guard.ts", APP_GUARD),
            GuardSource::new("users/index.guard.ts", USERS_GUARD),
        ],
        redirects: vec![
            RedirectRule::new("", "new-root"),
            RedirectRule::new("foobar", "about"),
        ],
    })
    .unwrap();

    assert_eq!(
        compiled.routing_module(),
        r#"import {
  NgModule
} from '@angular/core';

import {
  RouterModule,
  Routes
} from '@angular/router';

import {
  AboutContactContributorsRouteIndexComponent
} from './about/#contact/#contributors/index.component';

import {
  AboutContactFormRouteIndexComponent
} from './about/#contact/#form/index.component';

import {
  AboutContactFormFoobarRouteIndexComponent
} from './about/#contact/#form/#foobar/index.component';

import {
  AboutContactRouteIndexComponent
} from './about/#contact/index.component';

import {
  AboutCareersRouteIndexComponent
} from './about/careers/index.component';

import {
  AboutRouteIndexComponent
} from './about/index.component';

import {
  UsersUserIdRouteIndexComponent
} from './users/_userId/index.component';

import {
  UsersUserIdLocationsLocationIdRouteIndexComponent
} from './users/_userId/locations/_locationId/index.component';

import {
  UsersUserIdLocationsRouteIndexComponent
} from './users/_userId/locations/index.component';

import {
  UsersFoobarRouteIndexComponent
} from './users/foobar/index.component';

import {
  UsersRouteIndexComponent
} from './users/index.component';

import {
  RootRouteIndexComponent
} from './index.component';

import {
  NotFoundComponent
} from './not-found.component';

import {
  AppRouteGuard
} from './index.guard';

import {
  MyRouteGuard
} from './users/index.guard';

const routes: Routes = [
  { path: '', redirectTo: 'new-root', pathMatch: 'full' },
  { path: 'foobar', redirectTo: 'about', pathMatch: 'prefix' },
  { path: '', children: [
    { path: '', component: RootRouteIndexComponent },
    { path: 'about/careers', component: AboutCareersRouteIndexComponent },
    { path: 'about', component: AboutRouteIndexComponent, children: [
      { path: 'contact', component: AboutContactRouteIndexComponent, children: [
        { path: 'contributors', component: AboutContactContributorsRouteIndexComponent },
        { path: 'form', component: AboutContactFormRouteIndexComponent, children: [
          { path: 'foobar', component: AboutContactFormFoobarRouteIndexComponent }
        ] }
      ] }
    ] },
    { path: 'users/foobar', component: UsersFoobarRouteIndexComponent },
    { path: 'users', component: UsersRouteIndexComponent, canActivate: [MyRouteGuard], canActivateChild: [MyRouteGuard], canDeactivate: [MyRouteGuard] },
    { path: 'users/:userId', component: UsersUserIdRouteIndexComponent },
    { path: 'users/:userId/locations/:locationId', component: UsersUserIdLocationsLocationIdRouteIndexComponent },
    { path: 'users/:userId/locations', component: UsersUserIdLocationsRouteIndexComponent }
  ], canActivate: [AppRouteGuard], canActivateChild: [AppRouteGuard], canDeactivate: [AppRouteGuard] },
  { path: '**', component: NotFoundComponent }
];

@NgModule({
  imports: [RouterModule.forRoot(routes)],
  exports: [RouterModule],
  providers: [AppRouteGuard, MyRouteGuard]
})
export class AppRoutingModule { }
"#
    );
}

#[test]
fn flat_pages_produce_one_top_level_route_each() {
    let compiled = compile(&CompileInput {
        page_paths: vec![
            "about/index.html".into(),
            "contact/index.html".into(),
            "users/_id/index.html".into(),
        ],
        redirects: vec![RedirectRule::new("old", "about")],
        ..Default::default()
    })
    .unwrap();

    let top = &compiled.tree.children;
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].kind, NodeKind::Redirect);
    assert_eq!(top[2].kind, NodeKind::Fallback);
    // ルートのインデックス + ページ 3 つ
    let group = root_group(&compiled.tree);
    assert_eq!(group.children.len(), 4);
    assert!(group.children.iter().all(|n| n.children.is_empty()));
}

#[test]
fn discovery_order_is_kept_between_literal_paths() {
    let compiled = compile(&input(&["about/index.html", "about/careers/index.html"])).unwrap();
    assert_eq!(paths(root_group(&compiled.tree)), vec!["", "about", "about/careers"]);
}

#[test]
fn literal_paths_precede_the_parameterized_path() {
    let compiled = compile(&input(&[
        "users/index.html",
        "users/_userId/index.html",
        "users/foobar/index.html",
    ]))
    .unwrap();
    assert_eq!(
        paths(root_group(&compiled.tree)),
        vec!["", "users", "users/foobar", "users/:userId"]
    );
}

#[test]
fn parameter_segments_under_a_scope_are_ordered_after_literals() {
    let compiled = compile(&input(&[
        "account/index.html",
        "account/#settings/_tab/index.html",
        "account/#settings/index.html",
        "account/#settings/profile/index.html",
    ]))
    .unwrap();
    let account = &root_group(&compiled.tree).children[1];
    let settings = &account.children[0];
    assert_eq!(settings.path_segment, "settings");
    assert_eq!(paths(settings), vec!["profile", ":tab"]);
}

#[test]
fn guard_attaches_only_to_its_own_directory() {
    let compiled = compile(&CompileInput {
        page_paths: vec![
            "users/index.html".into(),
            "users/_userId/index.html".into(),
        ],
        guard_sources: vec![GuardSource::new("users/index.guard.ts", USERS_GUARD)],
        ..Default::default()
    })
    .unwrap();

    let group = root_group(&compiled.tree);
    assert!(group.guard.is_none());
    let users = group.children.iter().find(|n| n.path_segment == "users").unwrap();
    assert_eq!(users.guard.as_ref().unwrap().capabilities.len(), 3);
    let user = group
        .children
        .iter()
        .find(|n| n.path_segment == "users/:userId")
        .unwrap();
    assert!(user.guard.is_none());

    assert_eq!(compiled.emitted.providers, vec!["MyRouteGuard"]);
    assert!(compiled.emitted.configuration_text.contains(
        "{ path: 'users/:userId', component: UsersUserIdRouteIndexComponent }"
    ));
}

#[test]
fn guard_in_a_nested_scope_sits_on_the_scope_node_only() {
    let compiled = compile(&CompileInput {
        page_paths: vec![
            "about/index.html".into(),
            "about/#contact/index.html".into(),
            "about/#contact/#form/index.html".into(),
        ],
        guard_sources: vec![GuardSource::new(
            "about/#contact/index.guard.ts",
            "export class ContactGuard { canActivate() { return true; } }",
        )],
        ..Default::default()
    })
    .unwrap();

    assert!(compiled.emitted.configuration_text.contains(
        "    { path: 'about', component: AboutRouteIndexComponent, children: [
      { path: 'contact', component: AboutContactRouteIndexComponent, children: [
        { path: 'form', component: AboutContactFormRouteIndexComponent }
      ], canActivate: [ContactGuard] }
    ] }"
    ));
    assert_eq!(compiled.emitted.providers, vec!["ContactGuard"]);
    assert!(compiled.routing_module().contains(
        "import {\n  ContactGuard\n} from './about/#contact/index.guard';"
    ));
}

#[test]
fn guard_on_a_directory_without_a_page_sits_on_the_grouping_node() {
    let compiled = compile(&CompileInput {
        page_paths: vec![
            "admin/#users/index.html".into(),
            "admin/#roles/index.html".into(),
        ],
        guard_sources: vec![GuardSource::new(
            "admin/index.guard.ts",
            "export class AdminGuard { canActivate() { return true; } }",
        )],
        ..Default::default()
    })
    .unwrap();

    let admin = &root_group(&compiled.tree).children[1];
    assert_eq!(admin.kind, NodeKind::Group);
    assert!(admin.component.is_none());
    assert_eq!(admin.guard.as_ref().unwrap().class_name, "AdminGuard");
    assert!(admin.children.iter().all(|n| n.guard.is_none()));

    assert!(compiled.emitted.configuration_text.contains(
        "    { path: 'admin', children: [
      { path: 'users', component: AdminUsersRouteIndexComponent },
      { path: 'roles', component: AdminRolesRouteIndexComponent }
    ], canActivate: [AdminGuard] }
  ] }"
    ));
}

#[test]
fn guard_without_a_route_is_not_imported() {
    let compiled = compile(&CompileInput {
        page_paths: vec!["about/index.html".into()],
        guard_sources: vec![GuardSource::new("users/index.guard.ts", USERS_GUARD)],
        ..Default::default()
    })
    .unwrap();

    assert!(compiled.emitted.providers.is_empty());
    assert!(
        compiled
            .emitted
            .imports
            .iter()
            .all(|i| i.kind == ImportKind::Component)
    );
}

#[test]
fn redirects_precede_pages_in_declared_order() {
    let compiled = compile(&CompileInput {
        page_paths: vec!["about/index.html".into()],
        redirects: vec![
            RedirectRule::new("", "new-root"),
            RedirectRule::new("foobar", "about"),
        ],
        ..Default::default()
    })
    .unwrap();

    let top = &compiled.tree.children;
    let first = top[0].redirect.as_ref().unwrap();
    let second = top[1].redirect.as_ref().unwrap();
    assert_eq!((first.target.as_str(), first.path_match), ("new-root", PathMatch::Full));
    assert_eq!((second.target.as_str(), second.path_match), ("about", PathMatch::Prefix));
    assert_eq!(top[2].kind, NodeKind::Group);
}

#[test]
fn two_guard_classes_in_one_file_abort_compilation() {
    let err = compile(&CompileInput {
        page_paths: vec!["users/index.html".into()],
        guard_sources: vec![GuardSource::new(
            "index.guard.ts",
            format!("{}\n\n{}", APP_GUARD, USERS_GUARD),
        )],
        ..Default::default()
    })
    .unwrap_err();

    assert_eq!(
        err,
        CompileError::AmbiguousGuardExport {
            path: "index.guard.ts".into()
        }
    );
    assert_eq!(
        err.to_string(),
        "As a best practice, only export one guard per file in \"index.guard.ts\"."
    );
}

#[test]
fn duplicate_identifiers_abort_before_building() {
    let err = compile(&input(&["my-page/index.html", "my_page/index.html"])).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateIdentifier { .. }));
}

#[test]
fn compiling_twice_is_byte_identical() {
    let build = || {
        compile(&CompileInput {
            page_paths: vec![
                "users/_userId/index.html".into(),
                "about/#team/index.html".into(),
                "users/index.html".into(),
            ],
            guard_sources: vec![GuardSource::new("users/index.guard.ts", USERS_GUARD)],
            redirects: vec![RedirectRule::new("home", "")],
        })
        .unwrap()
        .routing_module()
    };
    assert_eq!(build(), build());
}
