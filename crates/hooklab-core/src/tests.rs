#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use web_time::Duration;

    use crate::*;

    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        frames: Vec<String>,
    }

    impl Recorder {
        fn new(log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                log: log.clone(),
                frames: Vec::new(),
            }
        }
    }

    impl PaintSurface for Recorder {
        fn paint(&mut self, frame: &Frame) {
            self.log.borrow_mut().push("paint".into());
            self.frames.push(frame.tree.text_content());
        }
    }

    fn text(s: impl Into<String>) -> Node {
        Node::new(NodeKind::Text { text: s.into() })
    }

    fn div(children: Vec<Node>) -> Node {
        Node::new(NodeKind::Block { tag: Tag::Div }).with_children(children)
    }

    fn button(label: &str, f: impl Fn() + 'static) -> Node {
        Node::new(NodeKind::Button {
            label: label.into(),
            on_click: Some(Rc::new(f)),
        })
    }

    fn input(placeholder: &str, value: Option<String>, on_change: impl Fn(String) + 'static) -> Node {
        Node::new(NodeKind::Input {
            id: None,
            placeholder: Some(placeholder.into()),
            value,
            on_change: Some(Rc::new(on_change)),
            node_ref: None,
            live: None,
        })
    }

    fn push(log: &Rc<RefCell<Vec<String>>>, s: &str) {
        log.borrow_mut().push(s.to_string());
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        count: i32,
        show_text: bool,
    }

    #[derive(Debug)]
    enum Act {
        Increment,
        ToggleShowText,
        Decrement,
    }

    fn counter(s: &Counter, a: &Act) -> Option<Counter> {
        match a {
            Act::Increment => Some(Counter {
                count: s.count + 1,
                show_text: s.show_text,
            }),
            Act::ToggleShowText => Some(Counter {
                count: s.count,
                show_text: !s.show_text,
            }),
            Act::Decrement => None,
        }
    }

    fn initial() -> Counter {
        Counter {
            count: 0,
            show_text: true,
        }
    }

    #[test]
    fn click_counter_folds_both_dispatches_into_one_render() {
        let seen: Ref<Vec<Counter>> = Ref::new(Vec::new());
        let seen2 = seen.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "ClickCounter", move || {
            let (state, dispatch) = use_reducer(counter, initial);
            seen2.with_mut(|v| v.push(state.clone()));
            let mut kids = vec![
                text(state.count.to_string()),
                button("Click Here", move || {
                    dispatch.send(Act::Increment);
                    dispatch.send(Act::ToggleShowText);
                }),
            ];
            if state.show_text {
                kids.push(text("This is a text"));
            }
            div(kids)
        });

        host.flush().unwrap();
        assert!(host.tree().contains_text("This is a text"));

        host.click("Click Here").unwrap();
        assert_eq!(
            seen.get().last(),
            Some(&Counter {
                count: 1,
                show_text: false
            })
        );
        assert!(!host.tree().contains_text("This is a text"));

        host.click("Click Here").unwrap();
        assert_eq!(
            seen.get(),
            vec![
                initial(),
                Counter {
                    count: 1,
                    show_text: false
                },
                Counter {
                    count: 2,
                    show_text: true
                },
            ]
        );
    }

    #[test]
    fn dispatch_sequence_equals_left_fold() {
        let script = || {
            vec![
                Act::Increment,
                Act::ToggleShowText,
                Act::Decrement,
                Act::Increment,
                Act::Increment,
                Act::ToggleShowText,
                Act::Decrement,
            ]
        };
        let expected = script()
            .iter()
            .fold(initial(), |s, a| counter(&s, a).unwrap_or(s));

        let last = Ref::new(initial());
        let last2 = last.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Fold", move || {
            let (state, dispatch) = use_reducer(counter, initial);
            last2.set(state);
            button("go", move || {
                for a in script() {
                    dispatch.send(a);
                }
            })
        });
        host.flush().unwrap();
        let report = host.click("go").unwrap();
        assert_eq!(report.renders, 1);
        assert_eq!(last.get(), expected);
    }

    #[test]
    fn unhandled_action_leaves_state_equal() {
        let last = Ref::new(initial());
        let last2 = last.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Noop", move || {
            let (state, dispatch) = use_reducer(counter, initial);
            last2.set(state);
            button("noop", move || dispatch.send(Act::Decrement))
        });
        host.flush().unwrap();
        let before = last.get();
        host.click("noop").unwrap();
        assert_eq!(last.get(), before);
    }

    #[test]
    fn strict_reducer_reports_unhandled_action() {
        let last = Ref::new(initial());
        let last2 = last.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Strict", move || {
            let (state, dispatch) = use_reducer_strict(counter, initial);
            last2.set(state);
            button("down", move || dispatch.send(Act::Decrement))
        });
        host.flush().unwrap();
        let err = host.click("down").unwrap_err();
        assert_eq!(
            err,
            HookError::UnhandledAction {
                action: "Decrement".into()
            }
        );
        assert_eq!(last.get(), initial());
    }

    #[test]
    fn setters_in_one_turn_batch_into_one_render() {
        let renders = Rc::new(Cell::new(0));
        let r = renders.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Batch", move || {
            r.set(r.get() + 1);
            let (n, set_n) = use_state(|| 0);
            let (label, set_label) = use_state(|| "idle".to_string());
            div(vec![
                text(format!("{n} {label}")),
                button("go", move || {
                    set_n.update(|n| n + 1);
                    set_n.update(|n| n + 1);
                    set_label.set("busy".into());
                }),
            ])
        });
        host.flush().unwrap();
        host.click("go").unwrap();
        assert_eq!(renders.get(), 2);
        assert!(host.tree().contains_text("2 busy"));
    }

    #[test]
    fn empty_deps_effect_runs_once_and_cleans_up_once() {
        let runs = Rc::new(Cell::new(0));
        let cleans = Rc::new(Cell::new(0));
        let (r, c) = (runs.clone(), cleans.clone());
        let mut host = Host::new(HostConfig::default(), NullSurface, "Once", move || {
            let (n, set_n) = use_state(|| 0);
            let (r, c) = (r.clone(), c.clone());
            use_effect(Deps::once(), move || {
                r.set(r.get() + 1);
                cleanup(move || c.set(c.get() + 1))
            });
            button(&format!("bump {n}"), move || set_n.update(|n| n + 1))
        });
        host.flush().unwrap();
        for i in 0..5 {
            host.click(&format!("bump {i}")).unwrap();
        }
        assert_eq!(runs.get(), 1);
        assert_eq!(cleans.get(), 0);

        host.unmount();
        assert_eq!(cleans.get(), 1);
        assert_eq!(host.instance_count(), 0);
    }

    #[test]
    fn omitted_deps_effect_cleans_up_before_each_rerun() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Always", move || {
            let (n, set_n) = use_state(|| 0);
            let l = l.clone();
            use_effect(Deps::always(), move || {
                push(&l, &format!("run {n}"));
                let l = l.clone();
                cleanup(move || push(&l, &format!("clean {n}")))
            });
            button("bump", move || set_n.update(|n| n + 1))
        });
        host.flush().unwrap();
        host.click("bump").unwrap();
        host.click("bump").unwrap();
        host.unmount();
        assert_eq!(
            *log.borrow(),
            ["run 0", "clean 0", "run 1", "clean 1", "run 2", "clean 2"]
        );
    }

    #[test]
    fn layout_effects_finish_before_paint_and_passive_effects() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let mut host = Host::new(HostConfig::default(), Recorder::new(&log), "Parent", move || {
            let (n, set_n) = use_state(|| 0);
            let lp = l.clone();
            use_layout_effect(Deps::always(), move || {
                push(&lp, "parent layout");
                Dispose::none()
            });
            let lp = l.clone();
            use_effect(Deps::always(), move || {
                push(&lp, "parent passive");
                Dispose::none()
            });
            let lc = l.clone();
            div(vec![
                text(n.to_string()),
                button("bump", move || set_n.update(|n| n + 1)),
                component("child", "Child", move || {
                    let l1 = lc.clone();
                    use_layout_effect(Deps::always(), move || {
                        push(&l1, "child layout");
                        Dispose::none()
                    });
                    let l2 = lc.clone();
                    use_effect(Deps::always(), move || {
                        push(&l2, "child passive");
                        Dispose::none()
                    });
                    Node::empty()
                }),
            ])
        });

        host.flush().unwrap();
        let expected = [
            "child layout",
            "parent layout",
            "paint",
            "child passive",
            "parent passive",
        ];
        assert_eq!(*log.borrow(), expected);

        log.borrow_mut().clear();
        host.click("bump").unwrap();
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn layout_effect_update_is_rendered_before_first_paint() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::new(HostConfig::default(), Recorder::new(&log), "Measure", || {
            let (width, set_width) = use_state(|| 0);
            use_layout_effect(Deps::once(), move || {
                set_width.set(400);
                Dispose::none()
            });
            text(width.to_string())
        });
        let report = host.flush().unwrap();
        assert_eq!(report.renders, 2);
        assert_eq!(report.paints, 1);
        assert_eq!(host.surface().frames, ["400"]);
    }

    #[test]
    fn passive_effect_update_paints_twice() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::new(HostConfig::default(), Recorder::new(&log), "Late", || {
            let (width, set_width) = use_state(|| 0);
            use_effect(Deps::once(), move || {
                set_width.set(400);
                Dispose::none()
            });
            text(width.to_string())
        });
        host.flush().unwrap();
        assert_eq!(host.surface().frames, ["0", "400"]);
    }

    trait Toggle {
        fn flip(&self);
    }

    struct Flipper(Setter<bool>);

    impl Toggle for Flipper {
        fn flip(&self) {
            self.0.update(|on| !on);
        }
    }

    fn toggle_child(handle: &HandleRef<dyn Toggle>) -> Node {
        let (on, set_on) = use_state(|| false);
        use_imperative_handle(handle, Deps::once(), move || {
            Rc::new(Flipper(set_on)) as Rc<dyn Toggle>
        });
        div(vec![
            text("child"),
            if on { text("Toggle") } else { Node::empty() },
        ])
    }

    #[test]
    fn imperative_handle_is_the_only_way_in() {
        let handle: HandleRef<dyn Toggle> = HandleRef::new();
        let attached_in_parent_layout = Rc::new(Cell::new(false));

        let (h, seen) = (handle.clone(), attached_in_parent_layout.clone());
        let mut host = Host::new(HostConfig::default(), NullSurface, "Parent", move || {
            let attached = h.clone();
            let seen = seen.clone();
            use_layout_effect(Deps::once(), move || {
                seen.set(attached.is_attached());
                Dispose::none()
            });
            let (click, child) = (h.clone(), h.clone());
            div(vec![
                button("Button From Parent", move || {
                    click.with(|t| t.flip()).unwrap();
                }),
                component("button", "Button", move || toggle_child(&child)),
            ])
        });

        assert_eq!(handle.with(|t| t.flip()), Err(HookError::HandleNotMounted));

        host.flush().unwrap();
        assert!(attached_in_parent_layout.get());
        assert!(!host.tree().contains_text("Toggle"));

        host.click("Button From Parent").unwrap();
        assert!(host.tree().contains_text("Toggle"));
        assert!(host.tree().contains_text("child"));

        host.click("Button From Parent").unwrap();
        assert!(!host.tree().contains_text("Toggle"));

        host.unmount();
        assert_eq!(handle.with(|t| t.flip()), Err(HookError::HandleNotMounted));
    }

    #[test]
    fn hiding_a_child_unmounts_it_and_drops_its_late_updates() {
        let cleaned = Rc::new(Cell::new(false));
        let leaked: Ref<Option<Setter<i32>>> = Ref::new(None);
        let (c, l) = (cleaned.clone(), leaked.clone());
        let mut host = Host::new(HostConfig::default(), NullSurface, "Toggler", move || {
            let (show, set_show) = use_state(|| true);
            let (c, l) = (c.clone(), l.clone());
            let child = if show {
                component("panel", "Panel", move || {
                    let (n, set_n) = use_state(|| 0);
                    l.set(Some(set_n));
                    let c = c.clone();
                    use_effect(Deps::once(), move || cleanup(move || c.set(true)));
                    text(format!("panel {n}"))
                })
            } else {
                Node::empty()
            };
            div(vec![button("hide", move || set_show.set(false)), child])
        });

        host.flush().unwrap();
        assert_eq!(host.instance_count(), 2);
        assert!(host.tree().contains_text("panel 0"));

        host.click("hide").unwrap();
        assert!(cleaned.get());
        assert_eq!(host.instance_count(), 1);

        // A result arriving after unmount is dropped, not applied.
        if let Some(set_n) = leaked.get() {
            set_n.set(7);
        }
        let report = host.flush().unwrap();
        assert_eq!(report.renders, 0);
        assert!(!host.text_content().contains("panel"));
    }

    #[derive(Clone, Default, PartialEq, Debug)]
    struct Theme(&'static str);

    #[test]
    fn context_reaches_components_mounted_inside_provider() {
        let mut host = Host::new(HostConfig::default(), NullSurface, "Themed", || {
            provide_context(Theme("dark"), || {
                component("leaf", "Leaf", || text(use_context::<Theme>().0))
            })
        });
        host.flush().unwrap();
        assert!(host.tree().contains_text("dark"));
    }

    #[test]
    fn memo_recomputes_only_on_dep_change() {
        let computes = Rc::new(Cell::new(0));
        let c = computes.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Memo", move || {
            let (count, set_count) = use_state(|| 1);
            let (other, set_other) = use_state(|| 0);
            let c = c.clone();
            let squared = use_memo(Deps::on(count), move || {
                c.set(c.get() + 1);
                count * count
            });
            div(vec![
                text(format!("{squared} {other}")),
                button("count", move || set_count.update(|n| n + 1)),
                button("other", move || set_other.update(|n| n + 1)),
            ])
        });
        host.flush().unwrap();
        host.click("other").unwrap();
        host.click("other").unwrap();
        assert_eq!(computes.get(), 1);
        host.click("count").unwrap();
        assert_eq!(computes.get(), 2);
        assert!(host.tree().contains_text("4 2"));
    }

    #[test]
    fn callback_identity_is_stable_while_deps_hold() {
        let ptrs: Ref<Vec<usize>> = Ref::new(Vec::new());
        let p = ptrs.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Cb", move || {
            let (n, set_n) = use_state(|| 0);
            let cb = use_callback(Deps::on(n / 2), move || n);
            p.with_mut(|v| v.push(Rc::as_ptr(&cb) as *const () as usize));
            button("bump", move || set_n.update(|n| n + 1))
        });
        host.flush().unwrap();
        host.click("bump").unwrap();
        host.click("bump").unwrap();
        let ptrs = ptrs.get();
        assert_eq!(ptrs.len(), 3);
        assert_eq!(ptrs[0], ptrs[1]);
        assert_ne!(ptrs[1], ptrs[2]);
    }

    #[test]
    fn transition_renders_urgent_state_first() {
        let seen: Ref<Vec<(String, String, bool)>> = Ref::new(Vec::new());
        let s = seen.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Search", move || {
            let (query, set_query) = use_state(String::new);
            let (pending, start) = use_transition();
            let deferred = use_deferred_value(query.clone());
            s.with_mut(|v| v.push((query.clone(), deferred.clone(), pending)));
            input("q", Some(query), move |v| {
                set_query.set(v);
                start.start(|| {});
            })
        });
        host.flush().unwrap();
        seen.set(Vec::new());

        let report = host.type_text("q", "a").unwrap();
        assert_eq!(report.paints, 2);
        assert_eq!(
            seen.get(),
            vec![
                ("a".to_string(), String::new(), true),
                ("a".to_string(), "a".to_string(), false),
            ]
        );
    }

    #[test]
    fn typing_echoes_each_keystroke() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::new(HostConfig::default(), Recorder::new(&log), "Echo", || {
            let (value, set_value) = use_state(|| "Pedro".to_string());
            div(vec![
                input("enter something...", None, move |v| set_value.set(v)),
                text(value),
            ])
        });
        host.flush().unwrap();
        host.type_text("enter something...", "ab").unwrap();
        assert_eq!(host.surface().frames, ["Pedro", "aa", "abab"]);
    }

    #[test]
    fn external_store_rerenders_and_unsubscribes() {
        let store = MemoryStore::new(1);
        let shared: Rc<dyn ExternalStore<i32>> = Rc::new(store.clone());
        let mut host = Host::new(HostConfig::default(), NullSurface, "Reader", move || {
            text(use_sync_external_store(&shared).to_string())
        });
        host.flush().unwrap();
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(host.text_content(), "1");

        store.set(5);
        host.flush().unwrap();
        assert_eq!(host.text_content(), "5");

        host.unmount();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn store_write_before_subscription_still_rerenders() {
        let store = MemoryStore::new(1);
        let shared: Rc<dyn ExternalStore<i32>> = Rc::new(store.clone());
        let writer = store.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Reader", move || {
            let value = use_sync_external_store(&shared);
            let writer = writer.clone();
            let child = component("writer", "Writer", move || {
                let writer = writer.clone();
                use_effect(Deps::once(), move || {
                    writer.set(5);
                    Dispose::none()
                });
                Node::empty()
            });
            div(vec![text(format!("value {value}")), child])
        });
        host.flush().unwrap();
        assert_eq!(store.get(), 5);
        assert_eq!(host.text_content(), "value 5");
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn spawn_blocking_delivers_on_a_later_turn() {
        assert_eq!(spawn_blocking(|| 1, |_| {}), Err(HookError::NoHost));

        let mut host = Host::new(HostConfig::default(), NullSurface, "Worker", || {
            let (answer, set_answer) = use_state(|| 0);
            use_effect(Deps::once(), move || {
                spawn_blocking(|| 21 * 2, move |v| set_answer.set(v)).unwrap();
                Dispose::none()
            });
            text(answer.to_string())
        });
        host.flush().unwrap();
        assert!(host.has_pending_external());
        host.run_until_idle(Duration::from_secs(5)).unwrap();
        assert!(!host.has_pending_external());
        assert_eq!(host.text_content(), "42");
    }

    #[test]
    fn panicking_work_is_no_longer_awaited() {
        let called = Rc::new(Cell::new(false));
        let c = called.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Crash", move || {
            let c = c.clone();
            use_effect(Deps::once(), move || {
                spawn_blocking(|| -> i32 { panic!("worker failed") }, move |_| c.set(true))
                    .unwrap();
                Dispose::none()
            });
            text("idle")
        });
        host.flush().unwrap();
        let started = web_time::Instant::now();
        host.run_until_idle(Duration::from_secs(5)).unwrap();
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(!host.has_pending_external());
        assert!(!called.get());
    }

    #[test]
    fn runaway_effect_hits_the_pass_limit() {
        let mut host = Host::new(HostConfig { max_passes: 8 }, NullSurface, "Runaway", || {
            let (n, set_n) = use_state(|| 0);
            use_effect(Deps::always(), move || {
                set_n.update(|n| n + 1);
                Dispose::none()
            });
            text(n.to_string())
        });
        assert_eq!(host.flush(), Err(HookError::RenderLoop { passes: 8 }));
    }

    #[test]
    fn node_ref_reads_before_paint_and_writes_repaint() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let mut host = Host::new(HostConfig::default(), Recorder::new(&log), "Field", move || {
            let field = use_node_ref();
            let (read, l) = (field.clone(), l.clone());
            use_layout_effect(Deps::once(), move || {
                push(&l, &format!("read {}", read.value().unwrap_or_default()));
                Dispose::none()
            });
            let write = field.clone();
            use_effect(Deps::once(), move || {
                write.set_value("HELLO").unwrap();
                Dispose::none()
            });
            Node::new(NodeKind::Input {
                id: None,
                placeholder: None,
                value: Some("PEDRO".into()),
                on_change: None,
                node_ref: Some(field),
                live: None,
            })
        });
        let report = host.flush().unwrap();
        assert_eq!(report.renders, 1);
        assert_eq!(*log.borrow(), ["read PEDRO", "paint", "paint"]);
        assert_eq!(host.surface().frames, ["PEDRO", "HELLO"]);
    }

    #[test]
    fn input_with_id_keeps_its_element_when_siblings_shift() {
        let mut host = Host::new(HostConfig::default(), NullSurface, "Form", || {
            let (typing, set_typing) = use_state(|| false);
            let mut field = input("name", None, move |_| set_typing.set(true));
            if let NodeKind::Input { id, .. } = &mut field.kind {
                *id = Some("name".into());
            }
            let mut children = Vec::new();
            if typing {
                children.push(text("hint"));
            }
            children.push(field);
            div(children)
        });
        host.flush().unwrap();
        host.type_text("name", "ab").unwrap();
        assert_eq!(host.text_content(), "hintab");
    }

    #[test]
    fn insertion_effects_run_before_layout_effects() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Tiers", move || {
            let layout = l.clone();
            use_layout_effect(Deps::once(), move || {
                push(&layout, "layout");
                Dispose::none()
            });
            let insertion = l.clone();
            use_insertion_effect(Deps::once(), move || {
                push(&insertion, "insertion");
                Dispose::none()
            });
            text("styled")
        });
        host.flush().unwrap();
        assert_eq!(*log.borrow(), ["insertion", "layout"]);
    }

    #[test]
    fn ids_are_unique_and_stable() {
        let ids: Ref<Vec<String>> = Ref::new(Vec::new());
        let i = ids.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Ids", move || {
            let (n, set_n) = use_state(|| 0);
            let a = use_id();
            let b = use_id();
            i.with_mut(|v| {
                v.push(a.clone());
                v.push(b.clone());
            });
            button(&format!("bump {n}"), move || set_n.update(|n| n + 1))
        });
        host.flush().unwrap();
        host.click("bump 0").unwrap();
        let ids = ids.get();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[0], ids[2]);
        assert_eq!(ids[1], ids[3]);
    }

    #[test]
    fn debug_values_are_visible_on_the_host() {
        let mut host = Host::new(HostConfig::default(), NullSurface, "Labelled", || {
            let (text_value, _) = use_state(|| "hi".to_string());
            use_debug_value(&text_value, |t| format!("Current text: {t}"));
            Node::empty()
        });
        host.flush().unwrap();
        assert_eq!(
            host.debug_labels(),
            vec![("Labelled", vec!["Current text: hi".to_string()])]
        );
    }

    #[test]
    fn clicking_a_missing_button_is_an_error() {
        let mut host = Host::new(HostConfig::default(), NullSurface, "Blank", Node::empty);
        host.flush().unwrap();
        assert_eq!(
            host.click("nope"),
            Err(HookError::NoSuchTarget {
                selector: "nope".into()
            })
        );
    }

    #[test]
    fn start_transition_defers_updates_behind_sync_ones() {
        let seen: Ref<Vec<(i32, i32)>> = Ref::new(Vec::new());
        let s = seen.clone();
        let mut host = Host::new(HostConfig::default(), NullSurface, "Lanes", move || {
            let (urgent, set_urgent) = use_state(|| 0);
            let (slow, set_slow) = use_state(|| 0);
            s.with_mut(|v| v.push((urgent, slow)));
            button("go", move || {
                let set_slow = set_slow.clone();
                start_transition(move || set_slow.set(10));
                set_urgent.set(1);
            })
        });
        host.flush().unwrap();
        let report = host.click("go").unwrap();
        assert_eq!(report.renders, 2);
        assert_eq!(seen.get(), vec![(0, 0), (1, 0), (1, 10)]);
    }

    #[test]
    fn poll_external_delivers_only_what_has_arrived() {
        let mut host = Host::new(HostConfig::default(), NullSurface, "Poller", || {
            let (v, set_v) = use_state(|| "waiting".to_string());
            use_effect(Deps::once(), move || {
                spawn_blocking(|| "done".to_string(), move |s| set_v.set(s)).unwrap();
                Dispose::none()
            });
            text(v)
        });
        host.flush().unwrap();
        assert!(host.is_mounted());

        let mut delivered = 0;
        for _ in 0..500 {
            delivered += host.poll_external().unwrap();
            if delivered > 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(delivered, 1);
        assert_eq!(host.text_content(), "done");

        host.unmount();
        assert!(!host.is_mounted());
    }
}
