/* This file is part of the ytconv project
*
*  Copyright (C) 2025 mini_bomba
*  
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::rc::Rc;

use yew::prelude::*;

use crate::confetti::ConfettiBurst;

#[derive(Properties, PartialEq)]
pub struct ConfettiLayerProps {
    pub bursts: Vec<(u64, Rc<ConfettiBurst>)>,
}

#[function_component]
pub fn ConfettiLayer(props: &ConfettiLayerProps) -> Html {
    html! {
        <div id="confetti-layer" aria-hidden="true">
            {for props.bursts.iter().map(|(id, burst)| html! {
                <div key={*id}>
                    {for burst.particles.iter().map(|particle| html! {
                        <div class="confetti" style={particle.style()} />
                    })}
                </div>
            })}
        </div>
    }
}
